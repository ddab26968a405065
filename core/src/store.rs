//! Open cursors of the record source.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use page_cursor_data_model::prelude::CursorToken;
use page_cursor_logger::prelude::*;

/// Idle time after which an open cursor is forgotten.
pub const DEFAULT_IDLE_TIME: Duration = Duration::from_secs(30);

/// Unknown cursor error.
///
/// Happens when a client sends a cursor that doesn't match any open one,
/// including cursors already replaced or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown cursor")]
pub struct UnknownCursor;

/// Sessions keyed by the cursor token handed out for them.
///
/// Every token is good for one request: taking a session removes it, and it
/// comes back under a fresh token.
#[derive(Debug)]
pub struct CursorStore<S> {
    sessions: HashMap<String, (S, Instant)>,
    idle_time: Duration,
}

impl<S> Default for CursorStore<S> {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIME)
    }
}

impl<S> CursorStore<S> {
    /// Constructs [`CursorStore`] forgetting cursors idle for `idle_time`.
    pub fn new(idle_time: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_time,
        }
    }

    /// Store `session` and issue the token to resume it.
    pub fn open(&mut self, session: S) -> CursorToken {
        self.expire();
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), (session, Instant::now()));
        CursorToken::issue(id)
    }

    /// Session of `cursor`, left in the store.
    ///
    /// # Errors
    /// If the cursor was never issued, was already used or expired.
    pub fn peek(&mut self, cursor: &CursorToken) -> Result<&S, UnknownCursor> {
        self.expire();
        self.sessions
            .get(cursor.as_wire())
            .map(|(session, _)| session)
            .ok_or(UnknownCursor)
    }

    /// Take the session of `cursor` out of the store.
    ///
    /// # Errors
    /// If the cursor was never issued, was already used or expired.
    pub fn take(&mut self, cursor: &CursorToken) -> Result<S, UnknownCursor> {
        self.expire();
        self.sessions
            .remove(cursor.as_wire())
            .map(|(session, _)| session)
            .ok_or(UnknownCursor)
    }

    /// Number of open cursors.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no cursor is open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn expire(&mut self) {
        let idle_time = self.idle_time;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, (_, opened)| opened.elapsed() <= idle_time);
        let expired = before - self.sessions.len();
        if expired > 0 {
            debug!(expired, "Forgot idle cursors");
        }
    }
}
