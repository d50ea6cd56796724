//! Data source boundary for repository queries.
//!
//! The orchestrator talks to a remote service only through the
//! [`RepositorySource`] trait defined here. The GitHub GraphQL client in
//! [`crate::github`] is the production implementation; tests plug in
//! in-memory sources.

mod errors;
mod types;

pub(crate) use errors::resets_at_suffix;
pub use errors::{Result, SourceError, short_error_message};
pub use types::{AccountSummary, RepositoryPage, RepositoryRecord, RepositorySource};
