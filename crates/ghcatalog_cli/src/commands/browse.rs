use std::io::Write;

use console::Term;
use ghcatalog::languages::LANGUAGES;
use ghcatalog::search::{SearchHandle, SearchView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::BrowseArgs;
use crate::commands::shared::{github_client, start_session};
use crate::config::Config;
use crate::render;
use crate::shutdown;

const HELP: &str = "\
Commands:
  user <login>        browse an account's repositories
  find <text>         suggest accounts (at least 3 characters)
  name [text]         filter by name; no text clears the filter
  lang [L ...]        filter by languages; no arguments clears the filter
  langs               list known languages
  forks on|off        include forks (drops name and language filters)
  next | prev         move one page forward or back
  page <n>            go to page n (1-based)
  size <10|25|50>     change the page size
  show                print the current page again
  help                show this help
  quit                leave";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowseCommand {
    User(String),
    Find(String),
    Name(String),
    Languages(Vec<String>),
    ListLanguages,
    Forks(bool),
    Next,
    Prev,
    Page(u32),
    Size(u32),
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<BrowseCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "user" | "u" => match rest.as_slice() {
            [login] => BrowseCommand::User((*login).to_string()),
            _ => return Err("usage: user <login>".to_string()),
        },
        "find" | "f" => BrowseCommand::Find(rest.join(" ")),
        "name" | "n" => BrowseCommand::Name(rest.join(" ")),
        "lang" | "l" => BrowseCommand::Languages(rest.iter().map(|l| (*l).to_string()).collect()),
        "langs" => BrowseCommand::ListLanguages,
        "forks" => match rest.as_slice() {
            ["on"] => BrowseCommand::Forks(true),
            ["off"] => BrowseCommand::Forks(false),
            _ => return Err("usage: forks on|off".to_string()),
        },
        "next" | ">" => BrowseCommand::Next,
        "prev" | "<" => BrowseCommand::Prev,
        "page" | "p" => match rest.as_slice() {
            [n] => match n.parse::<u32>() {
                Ok(n) if n >= 1 => BrowseCommand::Page(n - 1),
                _ => return Err(format!("invalid page number: {n}")),
            },
            _ => return Err("usage: page <n>".to_string()),
        },
        "size" => match rest.as_slice() {
            [n] => n
                .parse::<u32>()
                .map(BrowseCommand::Size)
                .map_err(|_| format!("invalid page size: {n}"))?,
            _ => return Err("usage: size <10|25|50>".to_string()),
        },
        "show" | "s" => BrowseCommand::Show,
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };

    Ok(Some(command))
}

enum Flow {
    Continue,
    Quit,
}

/// Interactive browser reading commands from stdin.
pub(crate) async fn handle_browse(
    args: BrowseArgs,
    config: &Config,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = config.search_options();
    if let Some(size) = args.page_size {
        options.page_size = ghcatalog::search::PageSize::new(size)?;
    }
    options.include_forks |= args.include_forks;

    let client = github_client(config, args.token)?;
    let handle = start_session(client, options);
    let mut views = handle.subscribe();
    let interactive = Term::stdout().is_term();

    if interactive {
        println!("ghcatalog - type `help` for commands.");
    }
    if let Some(account) = args.account {
        handle.select_account(account)?;
    } else {
        draw(&handle.view());
    }
    prompt(interactive);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if let Flow::Quit = execute(&handle, command)? {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
                prompt(interactive);
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                draw(&view);
                prompt(interactive);
            }
            _ = shutdown::requested(&mut shutdown) => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn execute(
    handle: &SearchHandle,
    command: BrowseCommand,
) -> Result<Flow, Box<dyn std::error::Error>> {
    match command {
        BrowseCommand::User(login) => handle.select_account(login)?,
        BrowseCommand::Find(text) => handle.account_input(text)?,
        BrowseCommand::Name(text) => handle.change_name_filter(text)?,
        BrowseCommand::Languages(languages) => handle.change_language_filters(languages)?,
        BrowseCommand::ListLanguages => println!("{}", LANGUAGES.join(", ")),
        BrowseCommand::Forks(include) => handle.toggle_include_forks(include)?,
        BrowseCommand::Next => {
            let view = handle.view();
            if view.account.is_none() {
                println!("Select an account first.");
            } else if !view.has_next_page {
                println!("Already on the last page.");
            } else {
                handle.change_page(view.page + 1)?;
            }
        }
        BrowseCommand::Prev => {
            let view = handle.view();
            if view.has_previous_page() {
                handle.change_page(view.page - 1)?;
            } else {
                println!("Already on the first page.");
            }
        }
        BrowseCommand::Page(page) => {
            let current = handle.view().page;
            if page > current + 1 {
                println!("Pages can only be reached one at a time going forward.");
            }
            handle.change_page(page)?;
        }
        BrowseCommand::Size(size) => {
            if let Err(e) = handle.change_page_size(size) {
                println!("{e}");
            }
        }
        BrowseCommand::Show => draw(&handle.view()),
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn draw(view: &SearchView) {
    if view.loading {
        println!("{}", render::status_line(view));
    } else {
        println!("{}", render::view(view));
    }
}

fn prompt(interactive: bool) {
    if interactive {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}
