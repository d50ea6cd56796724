//! GitHub GraphQL client implementing the repository data source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::convert::{to_account_summaries, to_repository_page};
use super::error::GitHubError;
use super::queries::{
    ACCOUNT_SUGGESTION_LIMIT, LIST_USER_REPOSITORIES, SEARCH_ACCOUNTS, SEARCH_REPOSITORIES,
};
use super::types::{
    AccountSearchData, GraphQlRequest, GraphQlResponse, ListData, ListVariables, SearchData,
    SearchVariables,
};
use crate::cursor::Cursor;
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::source::{self, AccountSummary, RepositoryPage, RepositorySource};

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("ghcatalog/", env!("CARGO_PKG_VERSION"));

/// Parse the reset time from GitHub's rate limit headers.
///
/// `x-ratelimit-reset` carries a Unix timestamp in seconds.
pub fn rate_limit_reset(resp: &HttpResponse) -> Option<DateTime<Utc>> {
    resp.header("x-ratelimit-reset")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn is_rate_limited_response(resp: &HttpResponse) -> bool {
    resp.status == 429 || resp.header("x-ratelimit-remaining").map(str::trim) == Some("0")
}

/// GitHub GraphQL client.
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client against the public endpoint using reqwest.
    pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
        Self::with_endpoint(DEFAULT_GRAPHQL_URL, token, DEFAULT_TIMEOUT)
    }

    /// Create a client against a custom endpoint (GitHub Enterprise, proxies).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(timeout)?;
        Ok(Self::with_transport(Arc::new(transport), endpoint, token))
    }

    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        endpoint: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Execute a GraphQL document and decode its `data` member.
    pub async fn execute<V, D>(&self, query: &str, variables: V) -> Result<D, GitHubError>
    where
        V: Serialize + Send,
        D: DeserializeOwned,
    {
        let body = serde_json::to_vec(&GraphQlRequest { query, variables })?;
        let mut request =
            HttpRequest::post_json(&self.endpoint, body).with_header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.with_header("Authorization", format!("bearer {token}"));
        }

        let resp = self.transport.send(request).await?;

        if resp.status == 401 {
            return Err(GitHubError::AuthRequired);
        }
        if (resp.status == 403 || resp.status == 429) && is_rate_limited_response(&resp) {
            return Err(GitHubError::RateLimited {
                reset_at: rate_limit_reset(&resp),
            });
        }
        if !resp.is_success() {
            let message = String::from_utf8_lossy(&resp.body).trim().to_string();
            return Err(GitHubError::Http {
                status: resp.status,
                message,
            });
        }

        let envelope: GraphQlResponse<D> = serde_json::from_slice(&resp.body)?;

        if !envelope.errors.is_empty() {
            let kinds: Vec<&str> = envelope
                .errors
                .iter()
                .filter_map(|e| e.kind.as_deref())
                .collect();
            if kinds.contains(&"RATE_LIMITED") {
                return Err(GitHubError::RateLimited {
                    reset_at: rate_limit_reset(&resp),
                });
            }
            if kinds.contains(&"NOT_FOUND") {
                let message = envelope
                    .errors
                    .iter()
                    .find(|e| e.kind.as_deref() == Some("NOT_FOUND"))
                    .map(|e| e.message.clone())
                    .unwrap_or_default();
                return Err(GitHubError::NotFound(message));
            }
            return Err(GitHubError::GraphQl {
                messages: envelope.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        envelope.data.ok_or_else(|| GitHubError::GraphQl {
            messages: vec!["response carried neither data nor errors".to_string()],
        })
    }

    pub async fn list_user_repositories(
        &self,
        account: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> Result<RepositoryPage, GitHubError> {
        let data: ListData = self
            .execute(
                LIST_USER_REPOSITORIES,
                ListVariables {
                    login: account,
                    first: page_size,
                    after: cursor.map(Cursor::as_str),
                },
            )
            .await
            .map_err(|e| match e {
                GitHubError::NotFound(_) => GitHubError::UnknownAccount(account.to_string()),
                other => other,
            })?;

        let user = data
            .user
            .ok_or_else(|| GitHubError::UnknownAccount(account.to_string()))?;
        let conn = user.repositories;
        Ok(to_repository_page(
            conn.nodes,
            conn.page_info,
            conn.total_count,
        ))
    }

    pub async fn search_repositories(
        &self,
        query: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> Result<RepositoryPage, GitHubError> {
        let data: SearchData = self
            .execute(
                SEARCH_REPOSITORIES,
                SearchVariables {
                    query,
                    first: page_size,
                    after: cursor.map(Cursor::as_str),
                },
            )
            .await?;

        let conn = data.search;
        Ok(to_repository_page(
            conn.nodes,
            conn.page_info,
            conn.repository_count,
        ))
    }

    pub async fn search_accounts(
        &self,
        fragment: &str,
    ) -> Result<Vec<AccountSummary>, GitHubError> {
        let data: AccountSearchData = self
            .execute(
                SEARCH_ACCOUNTS,
                SearchVariables {
                    query: fragment,
                    first: ACCOUNT_SUGGESTION_LIMIT,
                    after: None,
                },
            )
            .await?;
        Ok(to_account_summaries(data.search.nodes))
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn list_user_repositories(
        &self,
        account: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> source::Result<RepositoryPage> {
        tracing::debug!(
            account,
            page_size,
            has_cursor = cursor.is_some(),
            "Listing repositories"
        );
        Ok(GitHubClient::list_user_repositories(self, account, page_size, cursor).await?)
    }

    async fn search_repositories(
        &self,
        query: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> source::Result<RepositoryPage> {
        tracing::debug!(
            query,
            page_size,
            has_cursor = cursor.is_some(),
            "Searching repositories"
        );
        Ok(GitHubClient::search_repositories(self, query, page_size, cursor).await?)
    }

    async fn search_accounts(&self, fragment: &str) -> source::Result<Vec<AccountSummary>> {
        tracing::debug!(fragment, "Searching accounts");
        Ok(GitHubClient::search_accounts(self, fragment).await?)
    }
}
