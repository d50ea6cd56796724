//! The orchestrator task and its handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::debounce::Debouncer;
use crate::query::RepoQuery;
use crate::source::{AccountSummary, RepositoryPage, RepositorySource, SourceError};

use super::error::SearchError;
use super::session::{AccountLookup, Completion, FetchRequest, OnFetchError, PageSize, Session};
use super::view::SearchView;

/// Default quiet period before a filter change refetches.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Options for a search session.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Quiet period for filter and fork-toggle refetches.
    pub debounce: Duration,
    /// Quiet period for account suggestion lookups.
    pub account_debounce: Duration,
    pub page_size: PageSize,
    pub include_forks: bool,
    pub on_error: OnFetchError,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            account_debounce: DEFAULT_DEBOUNCE,
            page_size: PageSize::default(),
            include_forks: false,
            on_error: OnFetchError::default(),
        }
    }
}

#[derive(Debug)]
enum Command {
    SelectAccount(String),
    ChangePage(u32),
    ChangePageSize(PageSize),
    NameFilter(String),
    LanguageFilters(Vec<String>),
    IncludeForks(bool),
    AccountInput(String),
    Shutdown,
}

/// Debounce deliveries. The ticket identifies the scheduling call so a
/// delivery that raced with a cancel is ignored.
#[derive(Debug, Clone, Copy)]
enum Timer {
    Refetch(u64),
    AccountLookup(u64),
}

enum Finished {
    Repositories {
        generation: u64,
        result: Result<RepositoryPage, SourceError>,
    },
    Accounts {
        generation: u64,
        result: Result<Vec<AccountSummary>, SourceError>,
    },
}

/// Start a search session on the current tokio runtime.
pub fn spawn<S>(source: Arc<S>, options: SearchOptions) -> SearchHandle
where
    S: RepositorySource + ?Sized + 'static,
{
    SearchOrchestrator::spawn(source, options)
}

/// Owns the [`Session`] and runs every remote call it asks for.
///
/// Events are handled one at a time on a single task: handle commands,
/// debounce deliveries and finished remote calls. After each event the
/// current [`SearchView`] is published if it changed.
pub struct SearchOrchestrator<S: RepositorySource + ?Sized + 'static> {
    source: Arc<S>,
    session: Session,
    commands: mpsc::UnboundedReceiver<Command>,
    timers: mpsc::UnboundedReceiver<Timer>,
    refetch: Debouncer<u64>,
    refetch_ticket: u64,
    lookup: Debouncer<u64>,
    lookup_ticket: u64,
    fetches: JoinSet<Finished>,
    view: watch::Sender<SearchView>,
}

impl<S: RepositorySource + ?Sized + 'static> SearchOrchestrator<S> {
    pub fn spawn(source: Arc<S>, options: SearchOptions) -> SearchHandle {
        let session = Session::new(options.page_size, options.include_forks, options.on_error);
        let (view_tx, view_rx) = watch::channel(session.view());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        let refetch_tx = timer_tx.clone();
        let refetch = Debouncer::new(options.debounce, move |ticket| {
            let _ = refetch_tx.send(Timer::Refetch(ticket));
        });
        let lookup = Debouncer::new(options.account_debounce, move |ticket| {
            let _ = timer_tx.send(Timer::AccountLookup(ticket));
        });

        let orchestrator = Self {
            source,
            session,
            commands: command_rx,
            timers: timer_rx,
            refetch,
            refetch_ticket: 0,
            lookup,
            lookup_ticket: 0,
            fetches: JoinSet::new(),
            view: view_tx,
        };

        let task = tokio::spawn(orchestrator.run());

        SearchHandle {
            commands: command_tx,
            view: view_rx,
            task,
        }
    }

    async fn run(mut self) {
        tracing::debug!("Search session started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(timer) = self.timers.recv() => self.handle_timer(timer),
                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    match joined {
                        Ok(finished) => self.handle_finished(finished),
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => tracing::warn!(error = %e, "Remote call task failed"),
                    }
                }
            }

            self.publish();
        }

        self.refetch.cancel();
        self.lookup.cancel();
        self.fetches.abort_all();
        tracing::debug!("Search session stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SelectAccount(account) => {
                self.cancel_refetch();
                let request = self.session.select_account(account);
                self.dispatch(request);
            }
            Command::ChangePage(page) => {
                if let Some(request) = self.session.change_page(page) {
                    self.dispatch(request);
                }
            }
            Command::ChangePageSize(size) => {
                self.cancel_refetch();
                if let Some(request) = self.session.change_page_size(size) {
                    self.dispatch(request);
                }
            }
            Command::NameFilter(text) => {
                if self.session.set_name_filter(text) {
                    self.schedule_refetch();
                }
            }
            Command::LanguageFilters(languages) => {
                if self.session.set_language_filters(languages) {
                    self.schedule_refetch();
                }
            }
            Command::IncludeForks(include_forks) => {
                self.session.set_include_forks(include_forks);
                self.schedule_refetch();
            }
            Command::AccountInput(text) => {
                if self.session.set_account_input(text).is_some() {
                    self.lookup_ticket += 1;
                    self.lookup.call(self.lookup_ticket);
                } else {
                    self.lookup.cancel();
                    self.lookup_ticket += 1;
                }
            }
            Command::Shutdown => {}
        }
    }

    fn handle_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Refetch(ticket) if ticket == self.refetch_ticket => {
                tracing::debug!(ticket, "Debounced refetch fired");
                if let Some(request) = self.session.restart() {
                    self.dispatch(request);
                }
            }
            Timer::AccountLookup(ticket) if ticket == self.lookup_ticket => {
                if let Some(lookup) = self.session.begin_account_lookup() {
                    self.dispatch_lookup(lookup);
                }
            }
            Timer::Refetch(_) | Timer::AccountLookup(_) => {}
        }
    }

    fn handle_finished(&mut self, finished: Finished) {
        match finished {
            Finished::Repositories { generation, result } => {
                if let Err(e) = &result {
                    tracing::warn!(generation, error = %e, "Repository query failed");
                }
                if self.session.complete(generation, result) == Completion::Stale {
                    tracing::debug!(generation, "Discarded stale repository response");
                }
            }
            Finished::Accounts { generation, result } => {
                if let Err(e) = &result {
                    tracing::warn!(generation, error = %e, "Account lookup failed");
                }
                if self.session.complete_account_lookup(generation, result) == Completion::Stale {
                    tracing::debug!(generation, "Discarded stale account suggestions");
                }
            }
        }
    }

    fn schedule_refetch(&mut self) {
        self.refetch_ticket += 1;
        self.refetch.call(self.refetch_ticket);
    }

    fn cancel_refetch(&mut self) {
        if self.refetch.is_pending() {
            tracing::debug!(ticket = self.refetch_ticket, "Pending refetch superseded");
        }
        self.refetch.cancel();
        self.refetch_ticket += 1;
    }

    fn dispatch(&mut self, request: FetchRequest) {
        tracing::debug!(
            generation = request.generation,
            mode = %request.query.mode(),
            page = request.page,
            page_size = request.page_size.get(),
            has_cursor = request.cursor.is_some(),
            "Issuing repository query"
        );

        let source = Arc::clone(&self.source);
        self.fetches.spawn(async move {
            let page_size = request.page_size.get();
            let cursor = request.cursor.as_ref();
            let result = match &request.query {
                RepoQuery::Listing { account } => {
                    source.list_user_repositories(account, page_size, cursor).await
                }
                RepoQuery::Search { query } => {
                    source.search_repositories(query, page_size, cursor).await
                }
            };
            Finished::Repositories {
                generation: request.generation,
                result,
            }
        });
    }

    fn dispatch_lookup(&mut self, lookup: AccountLookup) {
        tracing::debug!(
            generation = lookup.generation,
            fragment = %lookup.fragment,
            "Looking up accounts"
        );

        let source = Arc::clone(&self.source);
        self.fetches.spawn(async move {
            let result = source.search_accounts(&lookup.fragment).await;
            Finished::Accounts {
                generation: lookup.generation,
                result,
            }
        });
    }

    fn publish(&self) {
        let session = &self.session;
        self.view.send_if_modified(|current| {
            let next = session.view();
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Control surface of a running search session.
///
/// Commands are queued and applied in order by the session task; remote
/// failures show up in the published [`SearchView`], never as errors here.
/// Dropping the handle stops the session.
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<SearchView>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    pub fn select_account(&self, account: impl Into<String>) -> Result<(), SearchError> {
        self.send(Command::SelectAccount(account.into()))
    }

    /// Move to the zero-based `page`.
    pub fn change_page(&self, page: u32) -> Result<(), SearchError> {
        self.send(Command::ChangePage(page))
    }

    pub fn change_page_size(&self, size: u32) -> Result<(), SearchError> {
        let size = PageSize::new(size)?;
        self.send(Command::ChangePageSize(size))
    }

    pub fn change_name_filter(&self, text: impl Into<String>) -> Result<(), SearchError> {
        self.send(Command::NameFilter(text.into()))
    }

    pub fn change_language_filters<I, S>(&self, languages: I) -> Result<(), SearchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(Command::LanguageFilters(
            languages.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn toggle_include_forks(&self, include_forks: bool) -> Result<(), SearchError> {
        self.send(Command::IncludeForks(include_forks))
    }

    /// Feed the account search box; suggestions are looked up once the
    /// input has settled.
    pub fn account_input(&self, text: impl Into<String>) -> Result<(), SearchError> {
        self.send(Command::AccountInput(text.into()))
    }

    /// The most recently published view.
    #[must_use]
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// A receiver notified on every view change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    /// Stop the session and wait for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Search session ended abnormally");
        }
    }

    fn send(&self, command: Command) -> Result<(), SearchError> {
        self.commands.send(command).map_err(|_| SearchError::Closed)
    }
}
