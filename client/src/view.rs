//! Display snapshot of a cursor client.

use serde::Serialize;

use crate::navigation::Phase;

/// Everything shown around the record table at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// Lifecycle of the client
    #[serde(serialize_with = "phase_as_str")]
    pub phase: Phase,
    /// 1-based page shown, `0` before the first load
    pub current_page: u32,
    /// e.g. `Page 2 of 3`
    pub page_info: String,
    /// e.g. `Showing 11-20 of 25 records`
    pub record_count_info: String,
    /// Present when rows were found deleted while scanning the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_rows_info: Option<String>,
    /// Present for clients that track page offsets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_pages_info: Option<String>,
    pub is_prev_disabled: bool,
    pub is_next_disabled: bool,
    pub show_pagination: bool,
    pub has_records: bool,
    pub records_returned: usize,
    /// Number of rows before the first row of this page
    pub row_number_offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn phase_as_str<S: serde::Serializer>(phase: &Phase, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(phase)
}
