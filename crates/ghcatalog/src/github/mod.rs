//! GitHub GraphQL data source.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GraphQL operations
//! - [`queries`] - GraphQL documents
//! - [`types`] - Wire types for requests and responses
//! - [`convert`] - Conversion to data source types
//! - [`client`] - The client and its `RepositorySource` implementation
//!
//! ```ignore
//! use ghcatalog::github::GitHubClient;
//! use ghcatalog::search::{SearchOptions, spawn};
//!
//! let client = GitHubClient::new(Some(token))?;
//! let handle = spawn(Arc::new(client), SearchOptions::default());
//! handle.select_account("rust-lang")?;
//! ```

mod client;
mod convert;
mod error;
mod queries;
mod types;

pub use client::{DEFAULT_GRAPHQL_URL, DEFAULT_TIMEOUT, GitHubClient, rate_limit_reset};
pub use error::GitHubError;
pub use queries::ACCOUNT_SUGGESTION_LIMIT;
