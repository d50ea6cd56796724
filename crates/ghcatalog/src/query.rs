//! Query composition for the two repository query shapes.

use std::fmt;

/// Which remote query shape a session uses.
///
/// Derived from the fork-inclusion flag only: the search API cannot return
/// forks mixed with sources, so including forks means listing the account
/// directly and giving up on server-side filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// Full-text repository search with name and language terms.
    FilteredSearch,
    /// Plain listing of the account's repositories.
    DirectListing,
}

impl QueryMode {
    #[inline]
    #[must_use]
    pub fn from_include_forks(include_forks: bool) -> Self {
        if include_forks {
            Self::DirectListing
        } else {
            Self::FilteredSearch
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FilteredSearch => "search",
            Self::DirectListing => "listing",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composed request target: either an account to list or a search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoQuery {
    Listing { account: String },
    Search { query: String },
}

impl RepoQuery {
    /// Compose the query for `mode`. Filters are ignored in listing mode.
    pub fn compose<S: AsRef<str>>(
        mode: QueryMode,
        account: &str,
        name_filter: &str,
        language_filters: &[S],
    ) -> Self {
        match mode {
            QueryMode::DirectListing => Self::Listing {
                account: account.to_string(),
            },
            QueryMode::FilteredSearch => Self::Search {
                query: build_query(account, Some(name_filter), language_filters),
            },
        }
    }

    #[must_use]
    pub fn mode(&self) -> QueryMode {
        match self {
            Self::Listing { .. } => QueryMode::DirectListing,
            Self::Search { .. } => QueryMode::FilteredSearch,
        }
    }
}

/// Build a repository search string scoped to `account`.
///
/// The name filter is passed through verbatim into the search grammar, so
/// callers wanting literal matching must quote it themselves.
///
/// ```
/// use ghcatalog::query::build_query;
///
/// assert_eq!(build_query("alice", None, &[] as &[&str]), "user:alice");
/// assert_eq!(
///     build_query("alice", Some("foo"), &["Go", "Rust"]),
///     "user:alice foo language:Go language:Rust"
/// );
/// ```
pub fn build_query<S: AsRef<str>>(
    account: &str,
    name_filter: Option<&str>,
    language_filters: &[S],
) -> String {
    let mut query = format!("user:{account}");

    if let Some(name) = name_filter
        && !name.is_empty()
    {
        query.push(' ');
        query.push_str(name);
    }

    for language in language_filters {
        query.push_str(" language:");
        query.push_str(language.as_ref());
    }

    query
}
