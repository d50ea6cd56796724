use std::sync::Arc;

use console::Term;
use ghcatalog::github::GitHubClient;
use ghcatalog::search::{self, SearchHandle, SearchOptions};

use crate::config::Config;

/// Build the GraphQL client from configuration and an optional CLI token.
pub(crate) fn github_client(
    config: &Config,
    token_override: Option<String>,
) -> Result<GitHubClient, Box<dyn std::error::Error>> {
    let token = token_override
        .filter(|t| !t.trim().is_empty())
        .or_else(|| config.github_token());
    let client = GitHubClient::with_endpoint(
        config.github.api_url.clone(),
        token,
        config.github_timeout(),
    )?;

    if !client.has_token() {
        if Term::stderr().is_term() {
            eprintln!(
                "Warning: no GitHub token configured; the GraphQL API rejects anonymous requests."
            );
            eprintln!("Set GITHUB_TOKEN or add a token to {}", config_hint());
        } else {
            tracing::warn!("No GitHub token configured; requests will be rejected");
        }
    }

    tracing::debug!(endpoint = client.endpoint(), "GitHub client ready");
    Ok(client)
}

/// Start a search session against GitHub.
pub(crate) fn start_session(client: GitHubClient, options: SearchOptions) -> SearchHandle {
    tracing::debug!(
        page_size = options.page_size.get(),
        include_forks = options.include_forks,
        debounce_ms = options.debounce.as_millis() as u64,
        "Starting search session"
    );
    search::spawn(Arc::new(client), options)
}

fn config_hint() -> String {
    Config::default_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "ghcatalog.toml".to_string())
}
