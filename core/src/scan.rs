//! Reading pages out of a frozen result set.

use page_cursor_data_model::prelude::{PageSize, Row};

use crate::records::RecordSet;

/// Rows read by one forward scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    /// Live rows, at most one page of them
    pub rows: Vec<Row>,
    /// Offset the following scan resumes from
    pub next_index: u64,
    /// Rows found deleted on the way
    pub deleted_rows: u64,
    /// Whether positions remain past `next_index`
    pub has_more: bool,
}

/// Storage positions of a result set, fixed when the cursor was opened.
///
/// Rows deleted afterwards keep their position here and are only noticed when
/// read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    positions: Vec<usize>,
}

impl Snapshot {
    /// Freeze the rows of `records` that are currently live.
    pub fn of(records: &RecordSet) -> Self {
        Self {
            positions: records.live_positions(),
        }
    }

    /// Number of positions, i.e. rows live when the snapshot was taken.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the result set was empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rows of the snapshot still live now.
    pub fn live_count(&self, records: &RecordSet) -> usize {
        self.positions
            .iter()
            .filter(|&&position| records.live(position).is_some())
            .count()
    }

    /// Scan forward from `start_index` until `page_size` live rows are read
    /// or the snapshot ends. Deleted rows are skipped and counted.
    pub fn scan_from(&self, records: &RecordSet, start_index: u64, page_size: PageSize) -> Scanned {
        let start = usize::try_from(start_index)
            .unwrap_or(usize::MAX)
            .min(self.positions.len());
        let wanted = page_size.get() as usize;

        let mut rows = Vec::with_capacity(wanted);
        let mut deleted_rows = 0;
        let mut next = start;
        for &position in &self.positions[start..] {
            if rows.len() == wanted {
                break;
            }
            next += 1;
            match records.live(position) {
                Some(row) => rows.push(row.clone()),
                None => deleted_rows += 1,
            }
        }

        Scanned {
            rows,
            next_index: next as u64,
            deleted_rows,
            has_more: next < self.positions.len(),
        }
    }

    /// Live rows at the positions of `page`. Rows deleted since the snapshot
    /// leave the page short.
    pub fn page(&self, records: &RecordSet, page: u32, page_size: PageSize) -> Vec<Row> {
        let offset = usize::try_from(page_size.offset_of(page)).unwrap_or(usize::MAX);
        self.positions
            .iter()
            .skip(offset)
            .take(page_size.get() as usize)
            .filter_map(|&position| records.live(position).cloned())
            .collect()
    }
}
