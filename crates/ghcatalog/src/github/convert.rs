//! Conversion from GitHub wire types to data source types.

use crate::cursor::Cursor;
use crate::source::{AccountSummary, RepositoryPage, RepositoryRecord};

use super::types::{AccountNode, PageInfo, RepositoryNode};

/// Convert a repository node; nodes without a name are not repositories.
pub fn to_repository_record(node: RepositoryNode) -> Option<RepositoryRecord> {
    let name = node.name?;
    Some(RepositoryRecord {
        name,
        description: node.description.filter(|d| !d.is_empty()),
        primary_language: node.primary_language.map(|l| l.name),
        is_fork: node.is_fork,
        url: node.url,
    })
}

/// Assemble a page from a connection's parts.
pub fn to_repository_page(
    nodes: Vec<Option<RepositoryNode>>,
    page_info: PageInfo,
    total_count: u64,
) -> RepositoryPage {
    RepositoryPage {
        records: nodes
            .into_iter()
            .flatten()
            .filter_map(to_repository_record)
            .collect(),
        end_cursor: page_info.end_cursor.map(Cursor::from),
        has_next_page: page_info.has_next_page,
        total_count,
    }
}

pub fn to_account_summaries(nodes: Vec<Option<AccountNode>>) -> Vec<AccountSummary> {
    nodes
        .into_iter()
        .flatten()
        .filter_map(|n| n.login)
        .map(|login| AccountSummary { login })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::types::Language;
    use super::*;

    #[test]
    fn record_keeps_optional_fields() {
        let record = to_repository_record(RepositoryNode {
            name: Some("ripgrep".to_string()),
            description: Some("fast grep".to_string()),
            url: Some("https://github.com/BurntSushi/ripgrep".to_string()),
            is_fork: Some(false),
            primary_language: Some(Language {
                name: "Rust".to_string(),
            }),
        })
        .expect("named node");

        assert_eq!(record.name, "ripgrep");
        assert_eq!(record.description.as_deref(), Some("fast grep"));
        assert_eq!(record.primary_language.as_deref(), Some("Rust"));
        assert_eq!(record.is_fork, Some(false));
    }

    #[test]
    fn empty_description_becomes_none() {
        let record = to_repository_record(RepositoryNode {
            name: Some("x".to_string()),
            description: Some(String::new()),
            ..Default::default()
        })
        .expect("named node");
        assert!(record.description.is_none());
    }

    #[test]
    fn page_skips_null_and_unnamed_nodes() {
        let page = to_repository_page(
            vec![
                None,
                Some(RepositoryNode::default()),
                Some(RepositoryNode {
                    name: Some("kept".to_string()),
                    ..Default::default()
                }),
            ],
            PageInfo {
                end_cursor: Some("abc".to_string()),
                has_next_page: true,
            },
            42,
        );

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].name, "kept");
        assert_eq!(page.end_cursor, Some(Cursor::new("abc")));
        assert!(page.has_next_page);
        assert_eq!(page.total_count, 42);
    }

    #[test]
    fn accounts_without_login_are_dropped() {
        let accounts = to_account_summaries(vec![
            Some(AccountNode {
                login: Some("octocat".to_string()),
            }),
            Some(AccountNode { login: None }),
            None,
        ]);
        assert_eq!(
            accounts,
            vec![AccountSummary {
                login: "octocat".to_string()
            }]
        );
    }
}
