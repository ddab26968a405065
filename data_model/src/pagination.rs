//! Structures related to page addressing.

use core::num::NonZeroU32;

use derive_more::Display;
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};

/// Number of rows on one page.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(transparent)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Page size used by the table controllers. Not configurable.
    pub const DEFAULT: Self = Self(nonzero!(10_u32));

    /// Constructs [`PageSize`].
    pub const fn new(size: NonZeroU32) -> Self {
        Self(size)
    }

    /// Rows per page.
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Scan offset of the first row of `page` when no rows were deleted
    /// before it. Pages `0` and `1` both start at `0`.
    pub fn offset_of(self, page: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(self.get())
    }

    /// Number of pages needed to show `total_records` rows.
    pub fn pages_for(self, total_records: u64) -> u32 {
        let pages = total_records.div_ceil(u64::from(self.get()));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Addressing of one `getPage` call.
///
/// Standard cursors are addressed by `page` alone. Advancing-index cursors
/// are addressed by `start_index`; `page` is passed through so the record
/// source can echo it in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// rows per page
    pub page_size: PageSize,
    /// 0-based scan offset to resume from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,
}

impl PageRequest {
    /// Request a page by its absolute number.
    pub const fn by_number(page: u32, page_size: PageSize) -> Self {
        Self {
            page,
            page_size,
            start_index: None,
        }
    }

    /// Request the page produced by scanning forward from `start_index`.
    pub const fn by_index(start_index: u64, page: u32, page_size: PageSize) -> Self {
        Self {
            page,
            page_size,
            start_index: Some(start_index),
        }
    }
}
