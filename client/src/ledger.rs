//! Start offsets of the pages an advancing-index client has visited.

use page_cursor_data_model::prelude::PageSize;
use page_cursor_logger::prelude::*;

/// Index-addressed record of page start offsets.
///
/// Position `i` holds the scan offset that produced page `i + 1`, so the
/// first entry is always `0`. Entries are only added by stepping forward one
/// page at a time; pages reached by a jump have no entry and fall back to
/// [`PageSize::offset_of`], which ignores rows deleted before them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLedger(Vec<u64>);

impl Default for PageLedger {
    fn default() -> Self {
        Self(vec![0])
    }
}

impl PageLedger {
    /// Forget everything but the first page.
    pub fn reset(&mut self) {
        self.0.clear();
        self.0.push(0);
    }

    /// Remember that `page` starts at `start_index`.
    ///
    /// Only the page right after the last tracked one is recorded. Returns
    /// whether the ledger grew.
    pub fn record_next(&mut self, page: u32, start_index: u64) -> bool {
        if page as usize != self.0.len() + 1 {
            trace!(page, tracked = self.0.len(), "Page start not recorded");
            return false;
        }
        self.0.push(start_index);
        trace!(page, start_index, "Recorded page start");
        true
    }

    /// Recorded start of `page`, if it was visited by stepping forward.
    pub fn start_of(&self, page: u32) -> Option<u64> {
        (page as usize)
            .checked_sub(1)
            .and_then(|position| self.0.get(position))
            .copied()
    }

    /// Recorded start of `page`, or its estimate when it was never recorded.
    pub fn start_or_estimate(&self, page: u32, page_size: PageSize) -> u64 {
        self.start_of(page)
            .unwrap_or_else(|| page_size.offset_of(page))
    }

    /// Number of tracked pages. Never zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Tracked offsets, by page.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn starts_with_first_page() {
        let ledger = PageLedger::default();
        assert_eq!(ledger.as_slice(), &[0]);
        assert_eq!(ledger.start_of(1), Some(0));
        assert_eq!(ledger.start_of(0), None);
    }

    #[test]
    fn ignores_pages_out_of_sequence() {
        let mut ledger = PageLedger::default();
        assert!(ledger.record_next(2, 11));
        assert!(!ledger.record_next(2, 12), "already tracked");
        assert!(!ledger.record_next(5, 40), "reached by a jump");
        assert_eq!(ledger.as_slice(), &[0, 11]);
    }

    #[test]
    fn falls_back_to_estimate() {
        let mut ledger = PageLedger::default();
        ledger.record_next(2, 13);

        assert_eq!(ledger.start_or_estimate(2, PageSize::DEFAULT), 13);
        assert_eq!(ledger.start_or_estimate(3, PageSize::DEFAULT), 20);

        ledger.reset();
        assert_eq!(ledger.as_slice(), &[0]);
    }

    proptest! {
        #[test]
        fn stepping_forward_tracks_every_page(skips in proptest::collection::vec(0_u64..5, 0..50)) {
            let mut ledger = PageLedger::default();
            let mut start = 0;
            for (page, skipped) in (2_u32..).zip(&skips) {
                start += 10 + skipped;
                prop_assert!(ledger.record_next(page, start));
            }
            prop_assert_eq!(ledger.len(), skips.len() + 1);
            let mut expected = 0;
            for (page, skipped) in (2_u32..).zip(&skips) {
                expected += 10 + skipped;
                prop_assert_eq!(ledger.start_of(page), Some(expected));
            }
        }
    }
}
