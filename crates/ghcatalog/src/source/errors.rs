use chrono::{DateTime, Utc};
use thiserror::Error;

/// Why a repository or account query failed.
///
/// Every variant renders as a single line that can be shown as-is next to
/// the results; [`short_error_message`] trims anything longer.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The account does not exist or is not visible to the caller.
    #[error("Account not found: {login}")]
    AccountNotFound { login: String },

    /// The service understood the request but refused the query. Messages
    /// are kept in the order the service reported them.
    #[error("Query rejected: {}", .messages.join("; "))]
    QueryRejected { messages: Vec<String> },

    /// Rate limit exhausted. The reset time is absent when the service did
    /// not report one.
    #[error("Rate limit exceeded{}", resets_at_suffix(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    /// Credentials missing or rejected.
    #[error("Credentials missing or rejected")]
    Unauthorized,

    /// Non-success HTTP status not covered above.
    #[error("Service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl SourceError {
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    #[inline]
    pub fn rejected<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::QueryRejected {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// ` (resets at ...)` when a reset time is known, otherwise nothing.
pub(crate) fn resets_at_suffix(reset_at: &Option<DateTime<Utc>>) -> String {
    reset_at
        .map(|at| format!(" (resets at {})", at.format("%H:%M:%S UTC")))
        .unwrap_or_default()
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of the rendered error, dropping multi-line details
/// such as response bodies.
///
/// ```
/// use ghcatalog::source::short_error_message;
///
/// let error = std::io::Error::other("connection reset\nat frame 3");
/// assert_eq!(short_error_message(&error), "connection reset");
/// ```
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for data source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
