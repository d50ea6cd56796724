//! Opaque pagination cursors and the stack used for backward navigation.
//!
//! A cursor returned by the data source marks the *end* of the page it was
//! returned with. Reaching page N+1 therefore uses the cursor recorded while
//! leaving page N, and going back to page N-1 needs the cursor recorded when
//! leaving page N-2. The stack keeps exactly those cursors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque position token issued by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Cursors pushed on each forward page transition.
///
/// The stack length equals the current page index as long as every page move
/// went through [`push_forward`](Self::push_forward) or
/// [`pop_backward`](Self::pop_backward) since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorStack {
    cursors: Vec<Cursor>,
}

impl CursorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cursor used to move to the next page.
    pub fn push_forward(&mut self, cursor: Cursor) {
        self.cursors.push(cursor);
    }

    /// Remove and return the most recent cursor.
    ///
    /// After the pop, [`top`](Self::top) is the cursor that reaches the new
    /// (previous) page, or `None` when that page is the first one.
    pub fn pop_backward(&mut self) -> Option<Cursor> {
        self.cursors.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Cursor> {
        self.cursors.last()
    }

    pub fn reset(&mut self) {
        self.cursors.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
