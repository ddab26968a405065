//! Page Cursor Data Model contains the wire structures exchanged between a
//! paginating client and a record source: opaque cursor tokens, page
//! requests, page results and display rows.

pub mod columns;
pub mod cursor;
pub mod page;
pub mod pagination;
pub mod row;

pub mod prelude {
    //! Prelude: re-export most commonly used traits, structs and macros from this crate.
    pub use super::{
        columns::{Column, ColumnKind, ACCOUNT_COLUMNS},
        cursor::CursorToken,
        page::{AdvancingPage, PageResult, ScanProgress, StandardPage, Totals},
        pagination::{PageRequest, PageSize},
        row::Row,
    };
}
