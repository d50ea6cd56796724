//! `completions` and `man`: output derived from the clap definition.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;

const BIN_NAME: &str = "ghcatalog";

fn write_completions(shell: Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, out);
}

fn write_man_page(out: &mut dyn Write) -> io::Result<()> {
    clap_mangen::Man::new(Cli::command()).render(out)
}

/// One page for the binary plus one per subcommand.
fn write_man_pages(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    clap_mangen::generate_to(Cli::command(), dir)
}

pub(crate) fn handle_completions(shell: Shell) -> io::Result<()> {
    write_completions(shell, &mut io::stdout().lock());
    Ok(())
}

pub(crate) fn handle_man(output: Option<PathBuf>) -> io::Result<()> {
    match output {
        Some(dir) => {
            write_man_pages(&dir)?;
            println!("Generated man pages in: {}", dir.display());
        }
        None => write_man_page(&mut io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completions(shell: Shell) -> String {
        let mut out = Vec::new();
        write_completions(shell, &mut out);
        String::from_utf8(out).expect("completions are UTF-8")
    }

    #[test]
    fn completions_cover_every_subcommand() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let script = completions(shell);
            for name in ["browse", "search", "completions", "man"] {
                assert!(script.contains(name), "{shell} completions miss {name}");
            }
        }
    }

    #[test]
    fn completions_offer_search_flags() {
        let script = completions(Shell::Bash);
        assert!(script.contains("--include-forks"));
        assert!(script.contains("--page-size"));
    }

    #[test]
    fn man_page_documents_configuration() {
        let mut out = Vec::new();
        write_man_page(&mut out).expect("render");
        let page = String::from_utf8(out).expect("man page is UTF-8");
        assert!(page.to_lowercase().contains(".th ghcatalog"));
        assert!(page.contains("GHCATALOG_GITHUB__TOKEN"));
    }

    #[test]
    fn man_pages_are_written_per_subcommand() {
        let dir = std::env::temp_dir().join(format!("ghcatalog-man-{}", std::process::id()));

        write_man_pages(&dir).expect("man pages");
        let names: Vec<String> = std::fs::read_dir(&dir)
            .expect("output directory")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        std::fs::remove_dir_all(&dir).expect("cleanup");

        assert!(names.iter().any(|n| n == "ghcatalog.1"), "{names:?}");
        assert!(names.iter().any(|n| n.contains("search")), "{names:?}");
        assert!(names.iter().any(|n| n.contains("browse")), "{names:?}");
    }
}
