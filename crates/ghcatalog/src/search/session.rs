//! Session state and its transition rules.
//!
//! [`Session`] is a plain value with no I/O. Each operation applies one
//! complete transition and returns the repository query to issue, if any;
//! the orchestrator task runs the query and feeds the outcome back through
//! [`Session::complete`]. Every issued query carries a generation number and
//! only the most recent one is ever applied.

use std::fmt;

use crate::cursor::{Cursor, CursorStack};
use crate::languages::normalize_languages;
use crate::query::{QueryMode, RepoQuery};
use crate::source::{
    AccountSummary, RepositoryPage, RepositoryRecord, SourceError, short_error_message,
};

use super::error::SearchError;
use super::view::{RepositoryRow, SearchStatus, SearchView, visible_columns};

/// Minimum account input length before suggestions are looked up.
pub const MIN_ACCOUNT_QUERY_LEN: usize = 3;

/// Rows per page. Only the sizes offered by the pager are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(u32);

impl PageSize {
    pub const ALLOWED: [u32; 3] = [10, 25, 50];

    pub fn new(size: u32) -> Result<Self, SearchError> {
        if Self::ALLOWED.contains(&size) {
            Ok(Self(size))
        } else {
            Err(SearchError::InvalidPageSize(size))
        }
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::ALLOWED[0])
    }
}

impl TryFrom<u32> for PageSize {
    type Error = SearchError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happens to the displayed results when a query fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnFetchError {
    /// Clear rows and count; only the error is shown.
    #[default]
    ClearResults,
    /// Keep the previous rows next to the error.
    KeepResults,
}

/// A repository query the orchestrator must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: RepoQuery,
    pub page: u32,
    pub page_size: PageSize,
    pub cursor: Option<Cursor>,
}

/// An account suggestion lookup the orchestrator must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLookup {
    pub generation: u64,
    pub fragment: String,
}

/// Outcome of feeding a response back into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

/// The live state of one search interaction.
#[derive(Debug, Clone)]
pub struct Session {
    selected_account: Option<String>,
    name_filter: String,
    language_filters: Vec<String>,
    include_forks: bool,
    page: u32,
    page_size: PageSize,
    cursors: CursorStack,
    /// End cursor of the page currently displayed.
    current_cursor: Option<Cursor>,
    results: Vec<RepositoryRecord>,
    total_count: u64,
    has_next_page: bool,
    last_error: Option<String>,
    on_error: OnFetchError,
    generation: u64,
    in_flight: Option<u64>,

    account_input: String,
    suggestions: Vec<AccountSummary>,
    suggestions_error: Option<String>,
    lookup_generation: u64,
    lookup_in_flight: Option<u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PageSize::default(), false, OnFetchError::default())
    }
}

impl Session {
    pub fn new(page_size: PageSize, include_forks: bool, on_error: OnFetchError) -> Self {
        Self {
            selected_account: None,
            name_filter: String::new(),
            language_filters: Vec::new(),
            include_forks,
            page: 0,
            page_size,
            cursors: CursorStack::new(),
            current_cursor: None,
            results: Vec::new(),
            total_count: 0,
            has_next_page: false,
            last_error: None,
            on_error,
            generation: 0,
            in_flight: None,
            account_input: String::new(),
            suggestions: Vec::new(),
            suggestions_error: None,
            lookup_generation: 0,
            lookup_in_flight: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> QueryMode {
        QueryMode::from_include_forks(self.include_forks)
    }

    #[must_use]
    pub fn selected_account(&self) -> Option<&str> {
        self.selected_account.as_deref()
    }

    #[must_use]
    pub fn name_filter(&self) -> &str {
        &self.name_filter
    }

    #[must_use]
    pub fn language_filters(&self) -> &[String] {
        &self.language_filters
    }

    #[must_use]
    pub fn include_forks(&self) -> bool {
        self.include_forks
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    #[must_use]
    pub fn cursors(&self) -> &CursorStack {
        &self.cursors
    }

    #[must_use]
    pub fn current_cursor(&self) -> Option<&Cursor> {
        self.current_cursor.as_ref()
    }

    #[must_use]
    pub fn results(&self) -> &[RepositoryRecord] {
        &self.results
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SearchStatus {
        if self.selected_account.is_none() {
            SearchStatus::Idle
        } else if self.in_flight.is_some() {
            SearchStatus::Loading
        } else if self.last_error.is_some() {
            SearchStatus::Failed
        } else {
            SearchStatus::Loaded
        }
    }

    /// Switch to `account` and fetch its first page.
    pub fn select_account(&mut self, account: impl Into<String>) -> FetchRequest {
        let account = account.into();
        self.selected_account = Some(account.clone());
        self.reset_paging();
        self.results.clear();
        self.total_count = 0;
        self.last_error = None;
        self.request(&account, None)
    }

    /// Move to `new_page`.
    ///
    /// Moving forward continues from the end cursor of the displayed page, so
    /// only one page can be skipped ahead at a time; larger jumps are
    /// shortened to the next page. Backward moves of any distance unwind the
    /// cursor stack. Returns `None` when there is nothing to do: no account,
    /// same page, or a forward move before the displayed page has loaded.
    pub fn change_page(&mut self, new_page: u32) -> Option<FetchRequest> {
        let account = self.selected_account.clone()?;

        if new_page == self.page {
            return None;
        }

        let cursor = if new_page > self.page {
            let cursor = self.current_cursor.clone()?;
            if new_page > self.page + 1 {
                tracing::debug!(
                    from = self.page,
                    requested = new_page,
                    "Forward jump shortened to the next page"
                );
            }
            self.cursors.push_forward(cursor.clone());
            self.page += 1;
            Some(cursor)
        } else {
            for _ in new_page..self.page {
                self.cursors.pop_backward();
            }
            self.page = new_page;
            self.cursors.top().cloned()
        };

        Some(self.request(&account, cursor))
    }

    /// Change the page size and restart from the first page.
    pub fn change_page_size(&mut self, page_size: PageSize) -> Option<FetchRequest> {
        self.page_size = page_size;
        self.restart()
    }

    /// Update the name filter. Returns whether the value changed; the caller
    /// schedules the refetch.
    pub fn set_name_filter(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.name_filter {
            return false;
        }
        self.name_filter = text;
        true
    }

    /// Update the language filters. Returns whether the set changed.
    pub fn set_language_filters<I, S>(&mut self, languages: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let languages = normalize_languages(languages);
        if languages == self.language_filters {
            return false;
        }
        self.language_filters = languages;
        true
    }

    /// Switch query mode. Filters are dropped since listing mode cannot apply
    /// them, and paging restarts because cursors are mode-specific. A query
    /// still running in the old mode is superseded.
    pub fn set_include_forks(&mut self, include_forks: bool) {
        self.include_forks = include_forks;
        self.name_filter.clear();
        self.language_filters.clear();
        self.reset_paging();
        self.has_next_page = false;
        if self.in_flight.take().is_some() {
            self.generation += 1;
        }
    }

    /// Reset paging and fetch the first page with the current filters.
    pub fn restart(&mut self) -> Option<FetchRequest> {
        self.reset_paging();
        let account = self.selected_account.clone()?;
        Some(self.request(&account, None))
    }

    /// Apply the response for `generation`.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<RepositoryPage, SourceError>,
    ) -> Completion {
        if self.in_flight != Some(generation) {
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.results = page.records;
                self.current_cursor = page.end_cursor;
                self.has_next_page = page.has_next_page;
                self.total_count = page.total_count;
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(short_error_message(&err));
                self.current_cursor = None;
                self.has_next_page = false;
                if self.on_error == OnFetchError::ClearResults {
                    self.results.clear();
                    self.total_count = 0;
                }
            }
        }

        Completion::Applied
    }

    /// Record account input. Returns the fragment to look up once the input
    /// is long enough; shorter input clears the suggestions immediately.
    pub fn set_account_input(&mut self, text: impl Into<String>) -> Option<&str> {
        self.account_input = text.into();
        if self.account_input.trim().chars().count() < MIN_ACCOUNT_QUERY_LEN {
            self.suggestions.clear();
            self.suggestions_error = None;
            self.lookup_in_flight = None;
            return None;
        }
        Some(self.account_input.trim())
    }

    /// Start a suggestion lookup for the current input.
    pub fn begin_account_lookup(&mut self) -> Option<AccountLookup> {
        let fragment = self.account_input.trim();
        if fragment.chars().count() < MIN_ACCOUNT_QUERY_LEN {
            return None;
        }
        let fragment = fragment.to_string();
        self.lookup_generation += 1;
        self.lookup_in_flight = Some(self.lookup_generation);
        Some(AccountLookup {
            generation: self.lookup_generation,
            fragment,
        })
    }

    pub fn complete_account_lookup(
        &mut self,
        generation: u64,
        result: Result<Vec<AccountSummary>, SourceError>,
    ) -> Completion {
        if self.lookup_in_flight != Some(generation) {
            return Completion::Stale;
        }
        self.lookup_in_flight = None;

        match result {
            Ok(accounts) => {
                self.suggestions = accounts;
                self.suggestions_error = None;
            }
            Err(err) => {
                self.suggestions.clear();
                self.suggestions_error = Some(short_error_message(&err));
            }
        }
        Completion::Applied
    }

    #[must_use]
    pub fn view(&self) -> SearchView {
        SearchView {
            status: self.status(),
            account: self.selected_account.clone(),
            name_filter: self.name_filter.clone(),
            language_filters: self.language_filters.clone(),
            include_forks: self.include_forks,
            mode: self.mode(),
            page: self.page,
            page_size: self.page_size.get(),
            rows: self.results.iter().map(RepositoryRow::from).collect(),
            columns: visible_columns(self.include_forks),
            total_count: self.total_count,
            has_next_page: self.has_next_page,
            loading: self.is_loading(),
            last_error: self.last_error.clone(),
            account_input: self.account_input.clone(),
            suggestions: self.suggestions.iter().map(|a| a.login.clone()).collect(),
            suggestions_loading: self.lookup_in_flight.is_some(),
            suggestions_error: self.suggestions_error.clone(),
        }
    }

    fn reset_paging(&mut self) {
        self.page = 0;
        self.cursors.reset();
        self.current_cursor = None;
    }

    fn request(&mut self, account: &str, cursor: Option<Cursor>) -> FetchRequest {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        // the displayed page is being replaced; its end cursor is spent
        self.current_cursor = None;
        self.has_next_page = false;

        FetchRequest {
            generation: self.generation,
            query: RepoQuery::compose(
                self.mode(),
                account,
                &self.name_filter,
                &self.language_filters,
            ),
            page: self.page,
            page_size: self.page_size,
            cursor,
        }
    }
}
