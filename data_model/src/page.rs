//! Page results returned by `init` and `getPage`.

use serde::{Deserialize, Serialize};

use crate::{cursor::CursorToken, row::Row};

/// One page of records together with the cursor to continue from.
///
/// `V` carries the fields specific to the cursor variant, see [`Totals`] and
/// [`ScanProgress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<V> {
    /// Cursor replacing the one used for the request
    #[serde(alias = "paginationCursor")]
    pub cursor: CursorToken,
    /// Rows of this page, in display order
    pub records: Vec<Row>,
    /// 1-based number of this page
    pub current_page: u32,
    /// Variant-specific bookkeeping
    #[serde(flatten)]
    pub progress: V,
}

/// Fields of a standard cursor page. Fixed for the whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Number of pages in the result set
    pub total_pages: u32,
    /// Number of records in the result set
    pub total_records: u64,
}

/// Fields of an advancing-index cursor page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgress {
    /// Live count of records, re-counted on every call
    pub total_records: u64,
    /// Scan offset the following page starts from
    pub next_index: u64,
    /// Rows found deleted while scanning this page
    #[serde(default)]
    pub deleted_rows: u64,
    /// Whether the scan can continue past this page
    pub has_more_pages: bool,
}

/// Page of a standard cursor.
pub type StandardPage = PageResult<Totals>;
/// Page of an advancing-index cursor.
pub type AdvancingPage = PageResult<ScanProgress>;
