//! ghcatalog - browse the repositories of a GitHub account.
//!
//! The library keeps the state of one search interaction (selected account,
//! name and language filters, fork inclusion, page and page size) and decides
//! for every input which remote query to run and with which pagination
//! cursor. Responses that were superseded by a newer request are dropped.
//!
//! # Features
//!
//! - `github` (default) - Enables the GitHub GraphQL data source and the
//!   reqwest-backed HTTP transport.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use ghcatalog::github::GitHubClient;
//! use ghcatalog::search::{self, SearchOptions, SearchStatus};
//!
//! let client = GitHubClient::new(std::env::var("GITHUB_TOKEN").ok())?;
//! let handle = search::spawn(Arc::new(client), SearchOptions::default());
//!
//! handle.select_account("rust-lang")?;
//! handle.change_language_filters(["Rust"])?;
//!
//! let mut views = handle.subscribe();
//! let view = views.wait_for(|v| v.status == SearchStatus::Loaded).await?;
//! for row in &view.rows {
//!     println!("{} {}", row.name, row.url);
//! }
//! ```

pub mod cursor;
pub mod debounce;
pub mod http;
pub mod languages;
pub mod query;
pub mod search;
pub mod source;

#[cfg(feature = "github")]
pub mod github;

pub use cursor::{Cursor, CursorStack};
pub use debounce::Debouncer;
pub use query::{QueryMode, RepoQuery, build_query};
pub use search::{SearchError, SearchHandle, SearchOptions, SearchView};
pub use source::{
    AccountSummary, RepositoryPage, RepositoryRecord, RepositorySource, SourceError,
    short_error_message,
};
