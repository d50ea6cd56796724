//! GraphQL documents sent to GitHub.

/// Repositories owned by a user, most recently updated first.
pub const LIST_USER_REPOSITORIES: &str = r#"
query ListUserRepositories($login: String!, $first: Int!, $after: String) {
  user(login: $login) {
    repositories(first: $first, after: $after, orderBy: { field: UPDATED_AT, direction: DESC }) {
      nodes {
        name
        description
        url
        isFork
        primaryLanguage { name }
      }
      pageInfo { endCursor hasNextPage }
      totalCount
    }
  }
}
"#;

/// Free-text repository search.
pub const SEARCH_REPOSITORIES: &str = r#"
query SearchRepositories($query: String!, $first: Int!, $after: String) {
  search(query: $query, type: REPOSITORY, first: $first, after: $after) {
    repositoryCount
    pageInfo { endCursor hasNextPage }
    nodes {
      ... on Repository {
        name
        description
        url
        isFork
        primaryLanguage { name }
      }
    }
  }
}
"#;

/// Account lookup backing login autocomplete.
pub const SEARCH_ACCOUNTS: &str = r#"
query SearchAccounts($query: String!, $first: Int!) {
  search(query: $query, type: USER, first: $first) {
    nodes {
      ... on User { login }
      ... on Organization { login }
    }
  }
}
"#;

/// Number of suggestions requested per account lookup.
pub const ACCOUNT_SUGGESTION_LIMIT: u32 = 10;
