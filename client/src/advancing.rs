//! Client of a record source that only knows how far its scan has come.
//!
//! The record source resumes each page from a scan offset instead of a page
//! number, skipping rows deleted since they were counted. Going back therefore
//! needs the offsets of pages already seen, which the client keeps in a
//! [`PageLedger`]. Pages never stepped onto, such as the last page reached by
//! a jump, are addressed by the estimate `(page - 1) * page_size`, which is
//! off by the number of rows deleted before them.

use async_trait::async_trait;
use page_cursor_data_model::prelude::*;
use page_cursor_logger::prelude::*;
use parking_lot::Mutex;

use crate::{
    flight::Flight,
    ledger::PageLedger,
    navigation::{Navigation, PageCursorClient, Phase, Skip},
    transport::CursorTransport,
    view::PageView,
};

const PAGE_SIZE: PageSize = PageSize::DEFAULT;

#[derive(Debug, Default)]
struct State {
    cursor: Option<CursorToken>,
    records: Vec<Row>,
    current_page: u32,
    progress: ScanProgress,
    ledger: PageLedger,
    error: Option<String>,
}

impl State {
    fn estimated_total_pages(&self) -> u32 {
        PAGE_SIZE.pages_for(self.progress.total_records)
    }
}

/// Cursor client addressing pages by the scan offset they start at.
#[derive(Debug)]
pub struct AdvancingIndexCursorClient<T> {
    transport: T,
    flight: Flight,
    state: Mutex<State>,
}

impl<T> AdvancingIndexCursorClient<T>
where
    T: CursorTransport<Page = AdvancingPage>,
{
    /// Constructs an uninitialized [`AdvancingIndexCursorClient`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            flight: Flight::default(),
            state: Mutex::new(State::default()),
        }
    }

    /// Record source of this client.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 1-based page shown, `0` before the first load.
    pub fn current_page(&self) -> u32 {
        self.state.lock().current_page
    }

    /// Scan progress reported with the current page.
    pub fn progress(&self) -> ScanProgress {
        self.state.lock().progress
    }

    /// Page count estimated from the live record count. `0` for an empty result set.
    pub fn estimated_total_pages(&self) -> u32 {
        self.state.lock().estimated_total_pages()
    }

    /// Start offsets of the pages visited by stepping forward.
    pub fn ledger(&self) -> PageLedger {
        self.state.lock().ledger.clone()
    }

    /// Cursor the next request will echo.
    pub fn cursor(&self) -> Option<CursorToken> {
        self.state.lock().cursor.clone()
    }

    /// Request the page `plan` picks, unless it decides to skip.
    async fn navigate<F>(&self, plan: F) -> Navigation
    where
        F: FnOnce(&mut State) -> Result<PageRequest, Skip> + Send,
    {
        let Some(_flight) = self.flight.try_begin() else {
            return Navigation::Skipped(Skip::Busy);
        };

        let planned = {
            let mut state = self.state.lock();
            match (plan(&mut *state), state.cursor.clone()) {
                (Ok(request), Some(cursor)) => {
                    state.error = None;
                    Ok((cursor, request))
                }
                (Ok(_), None) => Err(Skip::OutOfRange),
                (Err(skip), _) => Err(skip),
            }
        };
        let (cursor, request) = match planned {
            Ok(planned) => planned,
            Err(skip) => {
                trace!(%skip, "Navigation skipped");
                return Navigation::Skipped(skip);
            }
        };

        debug!(
            page = request.page,
            start_index = request.start_index,
            "Fetching page"
        );
        let result = self.transport.get_page(&cursor, request).await;

        let mut state = self.state.lock();
        match result {
            Ok(page) => {
                state.cursor = Some(page.cursor);
                state.records = page.records;
                state.current_page = page.current_page;
                state.progress = page.progress;
                if page.progress.deleted_rows > 0 {
                    debug!(
                        deleted_rows = page.progress.deleted_rows,
                        "Deleted rows skipped"
                    );
                }
                Navigation::Loaded
            }
            Err(failure) => {
                warn!(error = %failure, "Failed to fetch page");
                state.error = Some(failure.user_message());
                Navigation::Failed
            }
        }
    }
}

#[async_trait]
impl<T> PageCursorClient for AdvancingIndexCursorClient<T>
where
    T: CursorTransport<Page = AdvancingPage>,
{
    async fn initialize(&self) -> Navigation {
        let Some(_flight) = self.flight.try_begin() else {
            return Navigation::Skipped(Skip::Busy);
        };
        self.state.lock().error = None;

        debug!("Starting advancing-index cursor");
        let result = self.transport.init().await;

        let mut state = self.state.lock();
        match result {
            Ok(page) => {
                state.cursor = Some(page.cursor);
                state.records = page.records;
                state.current_page = page.current_page;
                state.progress = page.progress;
                state.ledger.reset();
                Navigation::Loaded
            }
            Err(failure) => {
                warn!(error = %failure, "Failed to start cursor");
                state.error = Some(failure.user_message());
                Navigation::Failed
            }
        }
    }

    async fn go_first(&self) -> Navigation {
        self.navigate(|state| {
            if state.current_page <= 1 {
                return Err(Skip::AlreadyThere);
            }
            Ok(PageRequest::by_index(0, 1, PAGE_SIZE))
        })
        .await
    }

    async fn go_previous(&self) -> Navigation {
        self.navigate(|state| {
            if state.current_page <= 1 {
                return Err(Skip::OutOfRange);
            }
            let target = state.current_page - 1;
            let start_index = state.ledger.start_or_estimate(target, PAGE_SIZE);
            Ok(PageRequest::by_index(start_index, target, PAGE_SIZE))
        })
        .await
    }

    async fn go_next(&self) -> Navigation {
        self.navigate(|state| {
            if !state.progress.has_more_pages {
                return Err(Skip::NoMorePages);
            }
            let target = state.current_page.saturating_add(1);
            let start_index = state.progress.next_index;
            // recorded before the request, a failed fetch keeps the entry
            state.ledger.record_next(target, start_index);
            Ok(PageRequest::by_index(start_index, target, PAGE_SIZE))
        })
        .await
    }

    async fn go_last(&self) -> Navigation {
        self.navigate(|state| {
            let target = state.estimated_total_pages();
            if state.current_page >= target {
                return Err(Skip::AlreadyThere);
            }
            Ok(PageRequest::by_index(
                PAGE_SIZE.offset_of(target),
                target,
                PAGE_SIZE,
            ))
        })
        .await
    }

    fn is_loading(&self) -> bool {
        self.flight.in_flight()
    }

    fn records(&self) -> Vec<Row> {
        self.state.lock().records.clone()
    }

    fn error_message(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    fn view(&self) -> PageView {
        let loading = self.is_loading();
        let state = self.state.lock();
        let current = state.current_page;
        let estimated = state.estimated_total_pages();
        let deleted_rows = state.progress.deleted_rows;

        PageView {
            phase: Phase::derive(loading, state.error.is_some(), state.cursor.is_some()),
            current_page: current,
            page_info: format!("Page {current} of ~{estimated}"),
            record_count_info: format!("{} total records", state.progress.total_records),
            deleted_rows_info: (deleted_rows > 0)
                .then(|| format!("{deleted_rows} deleted rows skipped on this page")),
            tracked_pages_info: Some(format!(
                "{} page indices tracked",
                state.ledger.len()
            )),
            is_prev_disabled: loading || current <= 1,
            is_next_disabled: loading || current >= estimated,
            show_pagination: estimated > 0,
            has_records: !state.records.is_empty(),
            records_returned: state.records.len(),
            row_number_offset: PAGE_SIZE.offset_of(current),
            error_message: state.error.clone(),
        }
    }
}
