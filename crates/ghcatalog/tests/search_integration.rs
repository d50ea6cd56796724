//! Integration tests for the search orchestrator.
//!
//! The data source used here never answers on its own: every call is handed
//! to the test, which decides when and with what it completes. That makes
//! out-of-order completion and in-flight teardown deterministic.
//!
//! Key scenarios tested:
//! - Only the latest request's response reaches the view
//! - Rapid filter and fork-toggle changes collapse into one fetch
//! - Toggling forks drops a query still running in the old mode
//! - Backward navigation reuses the recorded cursors
//! - Failures surface as view state and leave paging usable
//! - Account suggestions are debounced and need three characters
//! - Dropping the handle aborts outstanding calls

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ghcatalog::search::{self, SearchHandle, SearchOptions, SearchStatus, SearchView};
use ghcatalog::{
    AccountSummary, Cursor, RepositoryPage, RepositoryRecord, RepositorySource, SourceError,
};
use tokio::sync::{mpsc, oneshot, watch};

/// Upper bound for anything the tests wait on. Time is paused, so this only
/// matters when a test would otherwise hang.
const WAIT_TIMEOUT: Duration = Duration::from_secs(30);

const DEBOUNCE: Duration = Duration::from_millis(300);

enum Reply {
    Page(oneshot::Sender<ghcatalog::source::Result<RepositoryPage>>),
    Accounts(oneshot::Sender<ghcatalog::source::Result<Vec<AccountSummary>>>),
}

/// One outstanding call to the scripted source.
struct Call {
    description: String,
    reply: Reply,
}

impl Call {
    fn page(self, page: RepositoryPage) {
        match self.reply {
            Reply::Page(tx) => {
                let _ = tx.send(Ok(page));
            }
            Reply::Accounts(_) => panic!("expected a repository call, got {}", self.description),
        }
    }

    fn fail(self, error: SourceError) {
        match self.reply {
            Reply::Page(tx) => {
                let _ = tx.send(Err(error));
            }
            Reply::Accounts(tx) => {
                let _ = tx.send(Err(error));
            }
        }
    }

    fn accounts(self, logins: &[&str]) {
        match self.reply {
            Reply::Accounts(tx) => {
                let _ = tx.send(Ok(logins
                    .iter()
                    .map(|login| AccountSummary {
                        login: (*login).to_string(),
                    })
                    .collect()));
            }
            Reply::Page(_) => panic!("expected an account lookup, got {}", self.description),
        }
    }

    fn is_abandoned(&self) -> bool {
        match &self.reply {
            Reply::Page(tx) => tx.is_closed(),
            Reply::Accounts(tx) => tx.is_closed(),
        }
    }
}

struct ScriptedSource {
    calls: mpsc::UnboundedSender<Call>,
}

impl ScriptedSource {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Call>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls: tx }), rx)
    }

    async fn page_call(&self, description: String) -> ghcatalog::source::Result<RepositoryPage> {
        let (tx, rx) = oneshot::channel();
        let _ = self.calls.send(Call {
            description,
            reply: Reply::Page(tx),
        });
        rx.await
            .unwrap_or_else(|_| Err(SourceError::network("call abandoned by test")))
    }
}

fn cursor_label(cursor: Option<&Cursor>) -> &str {
    cursor.map_or("-", Cursor::as_str)
}

#[async_trait]
impl RepositorySource for ScriptedSource {
    async fn list_user_repositories(
        &self,
        account: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> ghcatalog::source::Result<RepositoryPage> {
        self.page_call(format!("list {account} {page_size} {}", cursor_label(cursor)))
            .await
    }

    async fn search_repositories(
        &self,
        query: &str,
        page_size: u32,
        cursor: Option<&Cursor>,
    ) -> ghcatalog::source::Result<RepositoryPage> {
        self.page_call(format!("search {query} {page_size} {}", cursor_label(cursor)))
            .await
    }

    async fn search_accounts(
        &self,
        fragment: &str,
    ) -> ghcatalog::source::Result<Vec<AccountSummary>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.calls.send(Call {
            description: format!("accounts {fragment}"),
            reply: Reply::Accounts(tx),
        });
        rx.await
            .unwrap_or_else(|_| Err(SourceError::network("call abandoned by test")))
    }
}

fn start(options: SearchOptions) -> (SearchHandle, mpsc::UnboundedReceiver<Call>) {
    let (source, calls) = ScriptedSource::new();
    (search::spawn(source, options), calls)
}

fn options() -> SearchOptions {
    SearchOptions {
        debounce: DEBOUNCE,
        account_debounce: DEBOUNCE,
        ..SearchOptions::default()
    }
}

fn repos(names: &[&str], end_cursor: &str, total: u64) -> RepositoryPage {
    RepositoryPage {
        records: names.iter().map(|n| RepositoryRecord::named(*n)).collect(),
        end_cursor: Some(Cursor::new(end_cursor)),
        has_next_page: true,
        total_count: total,
    }
}

async fn next_call(calls: &mut mpsc::UnboundedReceiver<Call>) -> Call {
    tokio::time::timeout(WAIT_TIMEOUT, calls.recv())
        .await
        .expect("timed out waiting for a source call")
        .expect("source dropped")
}

/// Let every runnable task go idle without reaching the debounce deadline.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn wait_view<F>(views: &mut watch::Receiver<SearchView>, predicate: F) -> SearchView
where
    F: FnMut(&SearchView) -> bool,
{
    tokio::time::timeout(WAIT_TIMEOUT, views.wait_for(predicate))
        .await
        .expect("timed out waiting for view")
        .expect("session stopped")
        .clone()
}

async fn wait_loaded(views: &mut watch::Receiver<SearchView>) -> SearchView {
    wait_view(views, |v| !v.loading && v.status != SearchStatus::Idle).await
}

#[tokio::test(start_paused = true)]
async fn superseded_response_is_discarded() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    let alice = next_call(&mut calls).await;
    handle.select_account("bob").expect("send");
    let bob = next_call(&mut calls).await;
    assert_eq!(alice.description, "search user:alice 10 -");
    assert_eq!(bob.description, "search user:bob 10 -");

    // the older call finishing first must not show up
    alice.page(repos(&["alice-repo"], "a0", 1));
    settle().await;
    let view = handle.view();
    assert!(view.loading);
    assert!(view.rows.is_empty());
    assert_eq!(view.account.as_deref(), Some("bob"));

    bob.page(repos(&["bob-repo"], "b0", 1));
    let view = wait_loaded(&mut views).await;
    assert_eq!(view.rows[0].name, "bob-repo");
    assert_eq!(view.status, SearchStatus::Loaded);
}

#[tokio::test(start_paused = true)]
async fn late_response_after_newer_one_is_discarded() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    let alice = next_call(&mut calls).await;
    handle.select_account("bob").expect("send");
    let bob = next_call(&mut calls).await;

    bob.page(repos(&["bob-repo"], "b0", 7));
    wait_loaded(&mut views).await;

    alice.page(repos(&["alice-repo"], "a0", 99));
    settle().await;
    let view = handle.view();
    assert_eq!(view.rows[0].name, "bob-repo");
    assert_eq!(view.total_count, 7);
}

#[tokio::test(start_paused = true)]
async fn fork_toggles_collapse_into_one_fetch() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    next_call(&mut calls).await.page(repos(&["r"], "c0", 1));
    wait_loaded(&mut views).await;

    handle.change_name_filter("cli").expect("send");
    handle.change_language_filters(["rust"]).expect("send");
    handle.toggle_include_forks(true).expect("send");
    handle.toggle_include_forks(false).expect("send");
    handle.toggle_include_forks(true).expect("send");
    settle().await;

    let view = handle.view();
    assert!(view.include_forks);
    assert_eq!(view.name_filter, "");
    assert!(view.language_filters.is_empty());
    assert!(calls.try_recv().is_err());

    tokio::time::sleep(DEBOUNCE).await;
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "list alice 10 -");

    tokio::time::sleep(DEBOUNCE * 3).await;
    assert!(calls.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn fork_toggle_supersedes_search_in_flight() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    next_call(&mut calls)
        .await
        .page(repos(&["search-p0"], "search-c0", 30));
    wait_loaded(&mut views).await;

    handle.change_page(1).expect("send");
    let pending = next_call(&mut calls).await;
    assert_eq!(pending.description, "search user:alice 10 search-c0");

    handle.toggle_include_forks(true).expect("send");
    settle().await;
    pending.page(repos(&["search-p1"], "search-c1", 30));
    settle().await;

    let view = handle.view();
    assert_eq!(view.page, 0);
    assert!(!view.has_next_page);
    assert!(view.rows.iter().all(|row| row.name != "search-p1"));

    // no cursor is known in the new mode until the listing arrives
    handle.change_page(1).expect("send");
    settle().await;
    assert!(calls.try_recv().is_err());

    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "list alice 10 -");
    call.page(repos(&["list-p0"], "list-c0", 40));
    let view = wait_view(&mut views, |v| {
        !v.loading && v.rows.first().is_some_and(|row| row.name == "list-p0")
    })
    .await;
    assert_eq!(view.page, 0);

    handle.change_page(1).expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "list alice 10 list-c0");
}

#[tokio::test(start_paused = true)]
async fn filter_change_resets_paging_when_refetch_fires() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    next_call(&mut calls).await.page(repos(&["r"], "c0", 30));
    wait_loaded(&mut views).await;
    handle.change_page(1).expect("send");
    next_call(&mut calls).await.page(repos(&["r"], "c1", 30));
    wait_view(&mut views, |v| v.page == 1 && !v.loading).await;

    handle.change_language_filters(["go", "Rust"]).expect("send");
    settle().await;
    // filter is visible right away, paging waits for the refetch
    assert_eq!(handle.view().language_filters, vec!["Go", "Rust"]);
    assert_eq!(handle.view().page, 1);

    let call = next_call(&mut calls).await;
    assert_eq!(
        call.description,
        "search user:alice language:Go language:Rust 10 -"
    );
    assert_eq!(handle.view().page, 0);
}

#[tokio::test(start_paused = true)]
async fn backward_navigation_reuses_cursors() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    next_call(&mut calls).await.page(repos(&["p0"], "c0", 50));
    wait_loaded(&mut views).await;

    handle.change_page(1).expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "search user:alice 10 c0");
    call.page(repos(&["p1"], "c1", 50));
    wait_view(&mut views, |v| v.page == 1 && !v.loading).await;

    handle.change_page(2).expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "search user:alice 10 c1");
    call.page(repos(&["p2"], "c2", 50));
    wait_view(&mut views, |v| v.page == 2 && !v.loading).await;

    handle.change_page(1).expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "search user:alice 10 c0");
    call.page(repos(&["p1"], "c1", 50));
    wait_view(&mut views, |v| v.page == 1 && !v.loading).await;

    handle.change_page(0).expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "search user:alice 10 -");
    call.page(repos(&["p0"], "c0", 50));
    let view = wait_view(&mut views, |v| v.page == 0 && !v.loading).await;
    assert_eq!(view.rows[0].name, "p0");
    assert_eq!(view.page_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn page_size_change_restarts_with_new_size() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    next_call(&mut calls).await.page(repos(&["p0"], "c0", 50));
    wait_loaded(&mut views).await;
    handle.change_page(1).expect("send");
    next_call(&mut calls).await.page(repos(&["p1"], "c1", 50));
    wait_view(&mut views, |v| v.page == 1 && !v.loading).await;

    handle.change_page_size(25).expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "search user:alice 25 -");
    assert_eq!(handle.view().page, 0);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_is_reported_and_paging_recovers() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("alice").expect("send");
    next_call(&mut calls).await.page(repos(&["p0"], "c0", 20));
    wait_loaded(&mut views).await;

    handle.change_page(1).expect("send");
    next_call(&mut calls)
        .await
        .fail(SourceError::network("connection reset"));
    let view = wait_view(&mut views, |v| v.status == SearchStatus::Failed).await;
    assert_eq!(view.last_error.as_deref(), Some("Network error: connection reset"));
    assert!(view.rows.is_empty());
    assert_eq!(view.total_count, 0);
    assert_eq!(view.page, 1);
    assert!(!view.is_empty_result());

    handle.change_page(0).expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "search user:alice 10 -");
    call.page(repos(&["p0"], "c0", 20));
    let view = wait_view(&mut views, |v| v.status == SearchStatus::Loaded).await;
    assert!(view.last_error.is_none());
    assert_eq!(view.page, 0);

    // debounced refetches still work after a failure
    handle.change_name_filter("tool").expect("send");
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "search user:alice tool 10 -");
}

#[tokio::test(start_paused = true)]
async fn empty_result_is_not_an_error() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.select_account("nobody-has-repos").expect("send");
    next_call(&mut calls).await.page(RepositoryPage::default());

    let view = wait_loaded(&mut views).await;
    assert!(view.is_empty_result());
    assert!(view.last_error.is_none());
    assert!(!view.has_next_page);
}

#[tokio::test(start_paused = true)]
async fn account_suggestions_follow_latest_input() {
    let (handle, mut calls) = start(options());
    let mut views = handle.subscribe();

    handle.account_input("o").expect("send");
    handle.account_input("oc").expect("send");
    handle.account_input("oct").expect("send");
    handle.account_input("octo").expect("send");
    settle().await;
    assert!(calls.try_recv().is_err());

    tokio::time::sleep(DEBOUNCE).await;
    let call = next_call(&mut calls).await;
    assert_eq!(call.description, "accounts octo");
    call.accounts(&["octocat", "octo-org"]);

    let view = wait_view(&mut views, |v| !v.suggestions.is_empty()).await;
    assert_eq!(view.suggestions, vec!["octocat", "octo-org"]);

    handle.account_input("oc").expect("send");
    let view = wait_view(&mut views, |v| v.suggestions.is_empty()).await;
    assert_eq!(view.account_input, "oc");
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_aborts_outstanding_calls() {
    let (handle, mut calls) = start(options());

    handle.select_account("alice").expect("send");
    let call = next_call(&mut calls).await;
    handle.change_name_filter("pending").expect("send");
    settle().await;

    drop(handle);
    settle().await;
    assert!(call.is_abandoned());

    // the pending debounce never fires
    tokio::time::sleep(DEBOUNCE * 3).await;
    assert!(calls.try_recv().is_err());
}
