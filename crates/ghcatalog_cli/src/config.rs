//! Configuration file support for ghcatalog.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `GHCATALOG_`, sections separated by
//!    a double underscore, e.g. `GHCATALOG_SEARCH__PAGE_SIZE`)
//! 3. Config file (./ghcatalog.toml, then ~/.config/ghcatalog/config.toml)
//! 4. Built-in defaults
//!
//! A GitHub token is taken from `GITHUB_TOKEN` when none is configured.
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use GHCATALOG_GITHUB__TOKEN / GITHUB_TOKEN
//! api_url = "https://api.github.com/graphql"
//! timeout_secs = 30
//!
//! [search]
//! debounce_ms = 400
//! account_debounce_ms = 400
//! page_size = 10
//! include_forks = false
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use ghcatalog::github::{DEFAULT_GRAPHQL_URL, DEFAULT_TIMEOUT};
use ghcatalog::search::{PageSize, SearchOptions};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Search session defaults.
    pub search: SearchConfig,
}

/// GitHub configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    pub token: Option<String>,
    /// GraphQL endpoint, for GitHub Enterprise or a proxy.
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_GRAPHQL_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Search session defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a filter change refetches.
    pub debounce_ms: u64,
    /// Quiet period before account suggestions are looked up.
    pub account_debounce_ms: u64,
    /// Rows per page (10, 25 or 50).
    pub page_size: u32,
    /// Include forks, which switches to a plain account listing.
    pub include_forks: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let defaults = SearchOptions::default();
        Self {
            debounce_ms: duration_ms(defaults.debounce),
            account_debounce_ms: duration_ms(defaults.account_debounce),
            page_size: defaults.page_size.get(),
            include_forks: defaults.include_forks,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/ghcatalog/config.toml)
    /// 3. Local config file (./ghcatalog.toml)
    /// 4. Environment variables with GHCATALOG_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("ghcatalog.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./ghcatalog.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., GHCATALOG_SEARCH__PAGE_SIZE -> search.page_size
        builder = builder.add_source(
            Environment::with_prefix("GHCATALOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token, falling back to `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        let usable = |t: &String| !t.trim().is_empty();
        self.github
            .token
            .clone()
            .filter(usable)
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(usable))
    }

    pub fn github_timeout(&self) -> Duration {
        Duration::from_secs(self.github.timeout_secs)
    }

    /// Configured page size, or the default when the value is not offered.
    pub fn page_size(&self) -> PageSize {
        match PageSize::new(self.search.page_size) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!("Ignoring configured page size: {}", e);
                PageSize::default()
            }
        }
    }

    /// Session options derived from the `[search]` section.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            debounce: Duration::from_millis(self.search.debounce_ms),
            account_debounce: Duration::from_millis(self.search.account_debounce_ms),
            page_size: self.page_size(),
            include_forks: self.search.include_forks,
            ..SearchOptions::default()
        }
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ghcatalog").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
