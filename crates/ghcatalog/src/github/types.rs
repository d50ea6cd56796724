//! GitHub GraphQL wire types.

use serde::{Deserialize, Serialize};

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    /// GitHub-specific error classification, e.g. `NOT_FOUND`, `RATE_LIMITED`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Request body for every query.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
pub struct ListVariables<'a> {
    pub login: &'a str,
    pub first: u32,
    pub after: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SearchVariables<'a> {
    pub query: &'a str,
    pub first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct ListData {
    pub user: Option<UserRepositories>,
}

#[derive(Debug, Deserialize)]
pub struct UserRepositories {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Vec<Option<RepositoryNode>>,
    pub page_info: PageInfo,
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub search: SearchConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConnection {
    pub repository_count: u64,
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<Option<RepositoryNode>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// A repository node. Every field is optional because search hits that are
/// not repositories come back as empty objects.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub is_fork: Option<bool>,
    pub primary_language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct Language {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountSearchData {
    pub search: AccountConnection,
}

#[derive(Debug, Deserialize)]
pub struct AccountConnection {
    #[serde(default)]
    pub nodes: Vec<Option<AccountNode>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountNode {
    pub login: Option<String>,
}
