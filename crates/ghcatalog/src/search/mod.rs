//! Search session: state, orchestration and the published view.
//!
//! # Module Structure
//!
//! - [`session`] - Pure session state and its transitions
//! - [`orchestrator`] - The task that runs remote calls for a session
//! - [`view`] - Snapshot handed to the presentation layer
//! - [`error`] - Handle errors
//!
//! A session is started with [`spawn`] and driven through the returned
//! [`SearchHandle`]. Every change is published as a [`SearchView`].

pub mod error;
pub mod orchestrator;
pub mod session;
pub mod view;

pub use error::SearchError;
pub use orchestrator::{DEFAULT_DEBOUNCE, SearchHandle, SearchOptions, SearchOrchestrator, spawn};
pub use session::{
    AccountLookup, Completion, FetchRequest, MIN_ACCOUNT_QUERY_LEN, OnFetchError, PageSize,
    Session,
};
pub use view::{Column, NO_LANGUAGE, RepositoryRow, SearchStatus, SearchView, visible_columns};
