//! In-memory record source serving both cursor variants.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use page_cursor_client::{
    error::{Failure, TransportFailure},
    transport::CursorTransport,
};
use page_cursor_data_model::prelude::*;
use page_cursor_logger::prelude::*;
use parking_lot::{Mutex, RwLock};

use crate::{
    records::RecordSet,
    scan::Snapshot,
    store::{CursorStore, UnknownCursor},
};

/// Record source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Unknown cursor error.
    #[error(transparent)]
    UnknownCursor(#[from] UnknownCursor),
    /// Standard page outside the result set.
    #[error("Page {page} is out of range, the result set has {total_pages} pages")]
    PageOutOfRange {
        /// Requested page
        page: u32,
        /// Pages in the result set
        total_pages: u32,
    },
    /// Advancing-index page requested without a start index.
    #[error("Start index is required to resume the scan")]
    MissingStartIndex,
}

impl Error {
    const fn status(self) -> u16 {
        match self {
            Self::UnknownCursor(_) => 404,
            Self::PageOutOfRange { .. } | Self::MissingStartIndex => 400,
        }
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Self::Transport(TransportFailure::with_body(
            Some(error.status()),
            error.to_string(),
        ))
    }
}

/// Rows in memory, paged through cursors the way a remote backend would.
///
/// Rows can be deleted while cursors are open. A cursor sees the rows that
/// were live when it was opened: standard pages silently come back short,
/// advancing-index scans skip and count the deleted rows.
#[derive(Debug)]
pub struct RecordSource {
    records: RwLock<RecordSet>,
    standard: Mutex<CursorStore<Snapshot>>,
    advancing: Mutex<CursorStore<Snapshot>>,
    failures: Mutex<VecDeque<Failure>>,
}

impl RecordSource {
    /// Constructs [`RecordSource`] over `records`.
    pub fn new(records: RecordSet) -> Self {
        Self {
            records: RwLock::new(records),
            standard: Mutex::default(),
            advancing: Mutex::default(),
            failures: Mutex::default(),
        }
    }

    /// Forget cursors idle for `idle_time` instead of the default.
    #[must_use]
    pub fn with_idle_time(self, idle_time: Duration) -> Self {
        Self {
            standard: Mutex::new(CursorStore::new(idle_time)),
            advancing: Mutex::new(CursorStore::new(idle_time)),
            ..self
        }
    }

    /// Standard cursor endpoint of this source.
    pub fn standard(self: &Arc<Self>) -> StandardSource {
        StandardSource(Arc::clone(self))
    }

    /// Advancing-index cursor endpoint of this source.
    pub fn advancing(self: &Arc<Self>) -> AdvancingSource {
        AdvancingSource(Arc::clone(self))
    }

    /// Delete the row at storage `position`. Returns `false` if there is no
    /// such row or it is already deleted.
    pub fn delete(&self, position: usize) -> bool {
        let deleted = self.records.write().delete(position);
        if deleted {
            debug!(position, "Row deleted");
        }
        deleted
    }

    /// Number of rows not deleted.
    pub fn live_count(&self) -> usize {
        self.records.read().live_count()
    }

    /// Number of cursors that can still be resumed.
    pub fn open_cursors(&self) -> usize {
        self.standard.lock().len() + self.advancing.lock().len()
    }

    /// Fail the next call to any endpoint with `failure`. Cursors are left as
    /// they are.
    pub fn fail_next(&self, failure: Failure) {
        self.failures.lock().push_back(failure);
    }

    fn injected_failure(&self) -> Result<(), Failure> {
        self.failures.lock().pop_front().map_or(Ok(()), Err)
    }

    fn init_standard(&self) -> StandardPage {
        let records = self.records.read();
        let snapshot = Snapshot::of(&records);
        let totals = totals(&snapshot, PageSize::DEFAULT);
        let rows = snapshot.page(&records, 1, PageSize::DEFAULT);
        debug!(total_records = totals.total_records, "Standard cursor opened");

        PageResult {
            cursor: self.standard.lock().open(snapshot),
            records: rows,
            current_page: 1,
            progress: totals,
        }
    }

    fn standard_page(
        &self,
        cursor: &CursorToken,
        request: PageRequest,
    ) -> Result<StandardPage, Error> {
        let (snapshot, totals) = {
            let mut store = self.standard.lock();
            let totals = totals(store.peek(cursor)?, request.page_size);
            if request.page < 1 || request.page > totals.total_pages {
                return Err(Error::PageOutOfRange {
                    page: request.page,
                    total_pages: totals.total_pages,
                });
            }
            (store.take(cursor)?, totals)
        };

        let rows = snapshot.page(&self.records.read(), request.page, request.page_size);
        Ok(PageResult {
            cursor: self.standard.lock().open(snapshot),
            records: rows,
            current_page: request.page,
            progress: totals,
        })
    }

    fn init_advancing(&self) -> AdvancingPage {
        let records = self.records.read();
        let snapshot = Snapshot::of(&records);
        let scanned = snapshot.scan_from(&records, 0, PageSize::DEFAULT);
        let total_records = snapshot.len() as u64;
        debug!(total_records, "Advancing-index cursor opened");

        PageResult {
            cursor: self.advancing.lock().open(snapshot),
            records: scanned.rows,
            current_page: 1,
            progress: ScanProgress {
                total_records,
                next_index: scanned.next_index,
                deleted_rows: scanned.deleted_rows,
                has_more_pages: scanned.has_more,
            },
        }
    }

    fn advancing_page(
        &self,
        cursor: &CursorToken,
        request: PageRequest,
    ) -> Result<AdvancingPage, Error> {
        let start_index = request.start_index.ok_or(Error::MissingStartIndex)?;
        let snapshot = self.advancing.lock().take(cursor)?;

        let (scanned, total_records) = {
            let records = self.records.read();
            (
                snapshot.scan_from(&records, start_index, request.page_size),
                snapshot.live_count(&records) as u64,
            )
        };
        if scanned.deleted_rows > 0 {
            debug!(
                start_index,
                deleted_rows = scanned.deleted_rows,
                "Skipped deleted rows"
            );
        }

        Ok(PageResult {
            cursor: self.advancing.lock().open(snapshot),
            records: scanned.rows,
            current_page: request.page,
            progress: ScanProgress {
                total_records,
                next_index: scanned.next_index,
                deleted_rows: scanned.deleted_rows,
                has_more_pages: scanned.has_more,
            },
        })
    }
}

fn totals(snapshot: &Snapshot, page_size: PageSize) -> Totals {
    let total_records = snapshot.len() as u64;
    Totals {
        total_pages: page_size.pages_for(total_records),
        total_records,
    }
}

/// Standard cursor endpoint of a [`RecordSource`].
#[derive(Debug, Clone)]
pub struct StandardSource(Arc<RecordSource>);

/// Advancing-index cursor endpoint of a [`RecordSource`].
#[derive(Debug, Clone)]
pub struct AdvancingSource(Arc<RecordSource>);

#[async_trait]
impl CursorTransport for StandardSource {
    type Page = StandardPage;

    async fn init(&self) -> Result<StandardPage, Failure> {
        self.0.injected_failure()?;
        Ok(self.0.init_standard())
    }

    async fn get_page(
        &self,
        cursor: &CursorToken,
        request: PageRequest,
    ) -> Result<StandardPage, Failure> {
        self.0.injected_failure()?;
        self.0.standard_page(cursor, request).map_err(Into::into)
    }
}

#[async_trait]
impl CursorTransport for AdvancingSource {
    type Page = AdvancingPage;

    async fn init(&self) -> Result<AdvancingPage, Failure> {
        self.0.injected_failure()?;
        Ok(self.0.init_advancing())
    }

    async fn get_page(
        &self,
        cursor: &CursorToken,
        request: PageRequest,
    ) -> Result<AdvancingPage, Failure> {
        self.0.injected_failure()?;
        self.0.advancing_page(cursor, request).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(count: usize) -> Arc<RecordSource> {
        Arc::new(RecordSource::new(RecordSet::accounts(count)))
    }

    #[tokio::test]
    async fn standard_totals_are_fixed_at_init() {
        let source = source(25);
        let endpoint = source.standard();
        let first = endpoint.init().await.unwrap();
        assert_eq!(first.progress.total_pages, 3);
        assert_eq!(first.records.len(), 10);

        assert!(source.delete(0));
        assert!(source.delete(24));
        let last = endpoint
            .get_page(&first.cursor, PageRequest::by_number(3, PageSize::DEFAULT))
            .await
            .unwrap();
        assert_eq!(last.progress.total_records, 25);
        assert_eq!(last.records.len(), 4);
        assert_ne!(last.cursor, first.cursor);
    }

    #[tokio::test]
    async fn replaced_cursor_is_rejected() {
        let source = source(25);
        let endpoint = source.advancing();
        let first = endpoint.init().await.unwrap();
        let request = PageRequest::by_index(first.progress.next_index, 2, PageSize::DEFAULT);

        endpoint.get_page(&first.cursor, request).await.unwrap();
        let failure = endpoint.get_page(&first.cursor, request).await.unwrap_err();
        assert_eq!(failure.user_message(), "Unknown cursor");
        assert_eq!(source.open_cursors(), 1);
    }

    #[tokio::test]
    async fn advancing_page_needs_start_index() {
        let source = source(25);
        let endpoint = source.advancing();
        let first = endpoint.init().await.unwrap();

        let failure = endpoint
            .get_page(&first.cursor, PageRequest::by_number(2, PageSize::DEFAULT))
            .await
            .unwrap_err();
        assert_eq!(
            failure.user_message(),
            "Start index is required to resume the scan"
        );
        // rejected before the cursor was taken
        assert_eq!(source.open_cursors(), 1);
    }

    #[tokio::test]
    async fn advancing_recounts_live_rows() {
        let source = source(25);
        let endpoint = source.advancing();
        let first = endpoint.init().await.unwrap();
        assert_eq!(first.progress.total_records, 25);

        source.delete(12);
        let second = endpoint
            .get_page(
                &first.cursor,
                PageRequest::by_index(first.progress.next_index, 2, PageSize::DEFAULT),
            )
            .await
            .unwrap();
        assert_eq!(second.progress.total_records, 24);
        assert_eq!(second.progress.deleted_rows, 1);
        assert_eq!(second.progress.next_index, 21);
        assert_eq!(second.current_page, 2);
    }

    #[tokio::test]
    async fn injected_failure_keeps_cursor() {
        let source = source(5);
        let endpoint = source.standard();
        let first = endpoint.init().await.unwrap();

        source.fail_next(Failure::Transport(TransportFailure::with_message(
            "Connection reset",
        )));
        let failure = endpoint
            .get_page(&first.cursor, PageRequest::by_number(1, PageSize::DEFAULT))
            .await
            .unwrap_err();
        assert_eq!(failure.user_message(), "Connection reset");

        endpoint
            .get_page(&first.cursor, PageRequest::by_number(1, PageSize::DEFAULT))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn out_of_range_page_is_a_bad_request() {
        let source = source(5);
        let endpoint = source.standard();
        let first = endpoint.init().await.unwrap();

        let failure = endpoint
            .get_page(&first.cursor, PageRequest::by_number(2, PageSize::DEFAULT))
            .await
            .unwrap_err();
        assert_eq!(
            failure,
            Failure::Transport(TransportFailure::with_body(
                Some(400),
                "Page 2 is out of range, the result set has 1 pages"
            ))
        );
    }

    #[tokio::test]
    async fn out_of_range_page_keeps_cursor() {
        let source = source(5);
        let endpoint = source.standard();
        let first = endpoint.init().await.unwrap();

        for page in [0, 2] {
            endpoint
                .get_page(&first.cursor, PageRequest::by_number(page, PageSize::DEFAULT))
                .await
                .unwrap_err();
            assert_eq!(source.open_cursors(), 1);
        }

        let retry = endpoint
            .get_page(&first.cursor, PageRequest::by_number(1, PageSize::DEFAULT))
            .await
            .unwrap();
        assert_eq!(retry.records.len(), 5);
        assert_eq!(source.open_cursors(), 1);
    }
}
