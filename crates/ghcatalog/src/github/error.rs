//! GitHub GraphQL error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::http::HttpError;
use crate::source::{SourceError, resets_at_suffix};

/// Errors that can occur when talking to the GitHub GraphQL API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("GitHub request failed: {0}")]
    Transport(#[from] HttpError),

    #[error("Malformed GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GitHub GraphQL error: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    /// A `NOT_FOUND` GraphQL error. The message names what could not be
    /// resolved.
    #[error("GitHub could not resolve: {0}")]
    NotFound(String),

    /// The login queried for repositories does not exist.
    #[error("No GitHub account named {0}")]
    UnknownAccount(String),

    #[error("GitHub rate limit exceeded{}", resets_at_suffix(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("GitHub rejected the credentials")]
    AuthRequired,
}

impl From<GitHubError> for SourceError {
    fn from(e: GitHubError) -> Self {
        match e {
            GitHubError::RateLimited { reset_at } => SourceError::RateLimited { reset_at },
            GitHubError::Http { status: 429, .. } => SourceError::RateLimited { reset_at: None },
            GitHubError::Http { status, message } => SourceError::Status { status, message },
            GitHubError::AuthRequired => SourceError::Unauthorized,
            GitHubError::UnknownAccount(login) => SourceError::AccountNotFound { login },
            GitHubError::NotFound(message) => SourceError::rejected([message]),
            GitHubError::GraphQl { messages } => SourceError::QueryRejected { messages },
            GitHubError::Transport(err) => SourceError::network(err.to_string()),
            GitHubError::Decode(err) => SourceError::MalformedResponse {
                message: err.to_string(),
            },
        }
    }
}
