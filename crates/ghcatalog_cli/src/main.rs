//! ghcatalog CLI - browse a GitHub account's repositories from the terminal.

mod commands;
mod config;
mod render;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::render::OutputFormat;

#[derive(Parser)]
#[command(name = "ghcatalog")]
#[command(version)]
#[command(about = "Browse and filter a GitHub account's repositories")]
#[command(
    long_about = "ghcatalog lists the repositories of a GitHub user or organization with \
cursor-based pagination. Results can be narrowed by name and language; including forks \
switches to a plain listing of the account."
)]
#[command(after_long_help = r#"EXAMPLES
    Browse interactively, starting with an account:
        $ ghcatalog browse rust-lang

    Print the Rust repositories of an account matching "async":
        $ ghcatalog search tokio-rs --name async --lang Rust

    Include forks, 25 per page, as JSON:
        $ ghcatalog search octocat --include-forks --page-size 25 --output json

    Generate shell completions:
        $ ghcatalog completions bash > ~/.local/share/bash-completion/completions/ghcatalog

CONFIGURATION
    ghcatalog reads configuration from:
      1. ~/.config/ghcatalog/config.toml (or $XDG_CONFIG_HOME/ghcatalog/config.toml)
      2. ./ghcatalog.toml
      3. Environment variables (GHCATALOG_* prefix, e.g., GHCATALOG_SEARCH__PAGE_SIZE)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GHCATALOG_GITHUB__TOKEN       GitHub personal access token
    GITHUB_TOKEN                  Used when no token is configured
    GHCATALOG_GITHUB__API_URL     GraphQL endpoint (default: https://api.github.com/graphql)
    GHCATALOG_SEARCH__DEBOUNCE_MS Quiet period before filter changes refetch (default: 400)
    RUST_LOG                      Log filter, e.g. ghcatalog=debug
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse an account's repositories interactively
    Browse(BrowseArgs),
    /// Print one page of an account's repositories
    Search(SearchArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, clap::Args)]
struct BrowseArgs {
    /// Account to open right away
    account: Option<String>,

    /// Rows per page: 10, 25 or 50 (default from config or 10)
    #[arg(short = 's', long)]
    page_size: Option<u32>,

    /// Include forks (lists the account without name/language filters)
    #[arg(short = 'f', long)]
    include_forks: bool,

    /// GitHub token (overrides config and GITHUB_TOKEN)
    #[arg(long, env = "GHCATALOG_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
struct SearchArgs {
    /// Account (user or organization) whose repositories to list
    account: String,

    /// Name filter, passed through to the search query
    #[arg(short, long)]
    name: Option<String>,

    /// Language filter; repeat for several languages
    #[arg(short, long)]
    lang: Vec<String>,

    /// Include forks (lists the account without name/language filters)
    #[arg(short = 'f', long)]
    include_forks: bool,

    /// Rows per page: 10, 25 or 50 (default from config or 10)
    #[arg(short = 's', long)]
    page_size: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// GitHub token (overrides config and GITHUB_TOKEN)
    #[arg(long, env = "GHCATALOG_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so tables on stdout stay clean; interactive sessions
    // only show warnings unless RUST_LOG says otherwise.
    let default_filter = if Term::stdout().is_term() {
        "warn"
    } else {
        "ghcatalog=info,ghcatalog_cli=info"
    };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default_filter),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Handle commands that don't need configuration first
    match &cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(*shell)?;
            return Ok(());
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output.clone())?;
            return Ok(());
        }
        _ => {}
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    // Set up graceful shutdown handler (Ctrl+C)
    let shutdown = shutdown::setup_shutdown_handler();

    match cli.command {
        Commands::Browse(args) => {
            commands::browse::handle_browse(args, &config, shutdown).await?;
        }
        Commands::Search(args) => {
            commands::search::handle_search(args, &config, shutdown).await?;
        }
        Commands::Completions { .. } | Commands::Man { .. } => {}
    }

    Ok(())
}
