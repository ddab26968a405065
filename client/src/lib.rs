//! Crate contains the cursor clients which page through a record source.

/// Client paging by scan offset
pub mod advancing;
/// Failures of record sources and their user-facing messages
pub mod error;
mod flight;
/// Start offsets of visited pages
pub mod ledger;
#[cfg(test)]
mod mock;
/// Capability shared by the clients
pub mod navigation;
/// Client paging by page number
pub mod standard;
/// Contract with the record source
pub mod transport;
/// Display snapshot
pub mod view;

pub use page_cursor_config as config;
pub use page_cursor_data_model as data_model;

pub mod prelude {
    //! Prelude: re-export most commonly used traits, structs and macros from this crate.
    pub use super::{
        advancing::AdvancingIndexCursorClient,
        error::{ApplicationFailure, Failure, TransportFailure},
        ledger::PageLedger,
        navigation::{Navigation, PageCursorClient, Phase, Skip},
        standard::StandardCursorClient,
        transport::{CursorTransport, JsonTransport, RemoteProcedure, Timeout},
        view::PageView,
    };
}
