//! Read-only snapshot handed to the presentation layer.

use std::fmt;

use serde::Serialize;

use crate::query::QueryMode;
use crate::source::RepositoryRecord;

/// Coarse session state for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// No account selected yet.
    Idle,
    /// A repository query is outstanding.
    Loading,
    /// The last query succeeded, possibly with zero results.
    Loaded,
    /// The last query failed.
    Failed,
}

/// Table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    Name,
    Description,
    Language,
    Fork,
    Url,
}

impl Column {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Description => "Description",
            Column::Language => "Language",
            Column::Fork => "Fork",
            Column::Url => "URL",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Columns to render. The fork column only carries information when forks
/// are part of the result set.
#[must_use]
pub fn visible_columns(include_forks: bool) -> Vec<Column> {
    let mut columns = vec![Column::Name, Column::Description, Column::Language];
    if include_forks {
        columns.push(Column::Fork);
    }
    columns.push(Column::Url);
    columns
}

/// Placeholder shown when a repository has no detected language.
pub const NO_LANGUAGE: &str = "N/A";

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRow {
    pub name: String,
    pub description: String,
    pub language: String,
    pub fork: bool,
    pub url: String,
}

impl From<&RepositoryRecord> for RepositoryRow {
    fn from(record: &RepositoryRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone().unwrap_or_default(),
            language: record
                .primary_language
                .clone()
                .unwrap_or_else(|| NO_LANGUAGE.to_string()),
            fork: record.is_fork.unwrap_or(false),
            url: record.url.clone().unwrap_or_default(),
        }
    }
}

impl RepositoryRow {
    #[must_use]
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Name => self.name.clone(),
            Column::Description => self.description.clone(),
            Column::Language => self.language.clone(),
            Column::Fork => if self.fork { "yes" } else { "" }.to_string(),
            Column::Url => self.url.clone(),
        }
    }
}

/// Everything the presentation layer needs, recomputed after each event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub status: SearchStatus,
    pub account: Option<String>,
    pub name_filter: String,
    pub language_filters: Vec<String>,
    pub include_forks: bool,
    #[serde(skip)]
    pub mode: QueryMode,
    /// Zero-based page index.
    pub page: u32,
    pub page_size: u32,
    pub rows: Vec<RepositoryRow>,
    pub columns: Vec<Column>,
    pub total_count: u64,
    pub has_next_page: bool,
    pub loading: bool,
    pub last_error: Option<String>,
    pub account_input: String,
    pub suggestions: Vec<String>,
    pub suggestions_loading: bool,
    pub suggestions_error: Option<String>,
}

impl SearchView {
    /// Loaded successfully with nothing to show.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.status == SearchStatus::Loaded && self.rows.is_empty()
    }

    /// Number of pages the result set spans.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page > 0
    }
}
