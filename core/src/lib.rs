//! In-memory record source for the page cursor clients.
//!
//! Serves standard and advancing-index cursors over the same rows, keeps the
//! open cursors in a [`store::CursorStore`] and lets rows be deleted between
//! requests.

pub mod records;
pub mod scan;
pub mod source;
pub mod store;

pub mod prelude {
    //! Re-exports important traits and types. Meant to be glob imported when using `page_cursor_core`.

    pub use super::{
        records::RecordSet,
        source::{AdvancingSource, RecordSource, StandardSource},
        store::UnknownCursor,
    };
}
