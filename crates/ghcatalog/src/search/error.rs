use thiserror::Error;

/// Errors returned by [`SearchHandle`](super::SearchHandle) commands.
///
/// Remote failures never appear here; they are reported through
/// [`SearchView::last_error`](super::SearchView::last_error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Unsupported page size {0}; expected one of 10, 25, 50")]
    InvalidPageSize(u32),

    #[error("Search session has shut down")]
    Closed,
}
