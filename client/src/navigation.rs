//! Capability shared by the cursor clients.

use async_trait::async_trait;
use page_cursor_data_model::prelude::Row;

use crate::view::PageView;

/// Outcome of one navigation call.
///
/// Guards never surface as errors: a navigation that cannot proceed is
/// [`Navigation::Skipped`] and leaves the client untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The page was fetched and is now shown
    Loaded,
    /// The request failed; the message is in [`PageCursorClient::error_message`]
    Failed,
    /// No request was made
    Skipped(Skip),
}

impl Navigation {
    /// Whether the transport was called.
    pub fn requested(self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Reason a navigation made no request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, displaydoc::Display)]
pub enum Skip {
    /// another request is outstanding
    Busy,
    /// target page is out of range
    OutOfRange,
    /// record source reported no more pages
    NoMorePages,
    /// already on the target page
    AlreadyThere,
}

/// Lifecycle of a client, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, displaydoc::Display)]
pub enum Phase {
    /// not initialized
    Uninitialized,
    /// loading
    Loading,
    /// ready
    Ready,
    /// failed
    Error,
}

impl Phase {
    pub(crate) fn derive(loading: bool, failed: bool, loaded: bool) -> Self {
        if loading {
            Self::Loading
        } else if failed {
            Self::Error
        } else if loaded {
            Self::Ready
        } else {
            Self::Uninitialized
        }
    }
}

/// Paginated record table driven by a cursor.
///
/// Every navigation clears the previous error first. At most one request is
/// outstanding per client; calls made meanwhile are skipped with
/// [`Skip::Busy`].
#[async_trait]
pub trait PageCursorClient: Send + Sync {
    /// Start a new scan and show its first page.
    async fn initialize(&self) -> Navigation;

    /// Show the first page.
    async fn go_first(&self) -> Navigation;

    /// Show the page before the current one.
    async fn go_previous(&self) -> Navigation;

    /// Show the page after the current one.
    async fn go_next(&self) -> Navigation;

    /// Show the last page.
    async fn go_last(&self) -> Navigation;

    /// Whether a request is outstanding.
    fn is_loading(&self) -> bool;

    /// Rows of the current page.
    fn records(&self) -> Vec<Row>;

    /// Message of the last failure, cleared by the next operation.
    fn error_message(&self) -> Option<String>;

    /// Snapshot of everything shown around the table.
    fn view(&self) -> PageView;
}
