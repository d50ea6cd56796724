use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;

use super::errors::Result;

/// Read-only projection of one remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub description: Option<String>,
    /// Name of the primary language, when the service detected one.
    pub primary_language: Option<String>,
    pub is_fork: Option<bool>,
    pub url: Option<String>,
}

impl RepositoryRecord {
    /// A record with only a name, for building fixtures.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            primary_language: None,
            is_fork: None,
            url: None,
        }
    }
}

/// One page of repositories plus the cursor that continues after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPage {
    pub records: Vec<RepositoryRecord>,
    /// Marks the end of this page; `None` when the page is empty.
    pub end_cursor: Option<Cursor>,
    pub has_next_page: bool,
    /// Size of the whole result set, not of this page.
    pub total_count: u64,
}

/// An account returned by the autocomplete search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub login: String,
}

/// Remote capability the search orchestrator is built on.
///
/// Implementations convert their own failures to
/// [`SourceError`](super::SourceError); the orchestrator never sees anything
/// else.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// List the repositories owned by `account`, forks included.
    async fn list_user_repositories(
        &self,
        account: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> Result<RepositoryPage>;

    /// Run a repository search with a composed query string.
    async fn search_repositories(
        &self,
        query: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> Result<RepositoryPage>;

    /// Find accounts whose login matches `fragment`.
    async fn search_accounts(&self, fragment: &str) -> Result<Vec<AccountSummary>>;
}
