//! Client of a record source that knows its page count up front.

use async_trait::async_trait;
use page_cursor_data_model::prelude::*;
use page_cursor_logger::prelude::*;
use parking_lot::Mutex;

use crate::{
    flight::Flight,
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
    totals: Totals,
    error: Option<String>,
}

/// Cursor client addressing pages by their absolute number.
///
/// Page count and record count are fixed when the scan starts.
#[derive(Debug)]
pub struct StandardCursorClient<T> {
    transport: T,
    flight: Flight,
    state: Mutex<State>,
}

impl<T> StandardCursorClient<T>
where
    T: CursorTransport<Page = StandardPage>,
{
    /// Constructs an uninitialized [`StandardCursorClient`].
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

    /// Show page `page`. Pages outside `1..=total_pages` are skipped.
    pub async fn go_to(&self, page: u32) -> Navigation {
        self.navigate(|_| page).await
    }

    /// Fetch the page picked by `target` from the state seen under the flight guard.
    async fn navigate<F>(&self, target: F) -> Navigation
    where
        F: FnOnce(&State) -> u32 + Send,
    {
        let Some(_flight) = self.flight.try_begin() else {
            return Navigation::Skipped(Skip::Busy);
        };

        let (cursor, page) = {
            let mut state = self.state.lock();
            let page = target(&state);
            if page < 1 || page > state.totals.total_pages {
                trace!(page, total_pages = state.totals.total_pages, "Page out of range");
                return Navigation::Skipped(Skip::OutOfRange);
            }
            let Some(cursor) = state.cursor.clone() else {
                return Navigation::Skipped(Skip::OutOfRange);
            };
            state.error = None;
            (cursor, page)
        };

        debug!(page, "Fetching page");
        let result = self
            .transport
            .get_page(&cursor, PageRequest::by_number(page, PAGE_SIZE))
            .await;

        let mut state = self.state.lock();
        match result {
            Ok(fetched) => {
                state.cursor = Some(fetched.cursor);
                state.records = fetched.records;
                state.current_page = fetched.current_page;
                Navigation::Loaded
            }
            Err(failure) => {
                warn!(page, error = %failure, "Failed to fetch page");
                state.error = Some(failure.user_message());
                Navigation::Failed
            }
        }
    }

    /// 1-based page shown, `0` before the first load.
    pub fn current_page(&self) -> u32 {
        self.state.lock().current_page
    }

    /// Page and record counts reported when the scan started.
    pub fn totals(&self) -> Totals {
        self.state.lock().totals
    }

    /// Cursor the next request will echo.
    pub fn cursor(&self) -> Option<CursorToken> {
        self.state.lock().cursor.clone()
    }
}

#[async_trait]
impl<T> PageCursorClient for StandardCursorClient<T>
where
    T: CursorTransport<Page = StandardPage>,
{
    async fn initialize(&self) -> Navigation {
        let Some(_flight) = self.flight.try_begin() else {
            return Navigation::Skipped(Skip::Busy);
        };
        self.state.lock().error = None;

        debug!("Starting standard cursor");
        let result = self.transport.init().await;

        let mut state = self.state.lock();
        match result {
            Ok(page) => {
                *state = State {
                    cursor: Some(page.cursor),
                    records: page.records,
                    current_page: page.current_page,
                    totals: page.progress,
                    error: None,
                };
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
        self.go_to(1).await
    }

    async fn go_previous(&self) -> Navigation {
        // page 0 is never requested, see `navigate`
        self.navigate(|state| state.current_page.saturating_sub(1)).await
    }

    async fn go_next(&self) -> Navigation {
        self.navigate(|state| state.current_page.saturating_add(1)).await
    }

    async fn go_last(&self) -> Navigation {
        self.navigate(|state| state.totals.total_pages).await
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
        let Totals {
            total_pages,
            total_records,
        } = state.totals;

        let start = PAGE_SIZE.offset_of(current) + 1;
        let end = (u64::from(current) * u64::from(PAGE_SIZE.get())).min(total_records);

        PageView {
            phase: Phase::derive(loading, state.error.is_some(), state.cursor.is_some()),
            current_page: current,
            page_info: format!("Page {current} of {total_pages}"),
            record_count_info: format!("Showing {start}-{end} of {total_records} records"),
            deleted_rows_info: None,
            tracked_pages_info: None,
            is_prev_disabled: loading || current <= 1,
            is_next_disabled: loading || current >= total_pages,
            show_pagination: total_pages > 0,
            has_records: !state.records.is_empty(),
            records_returned: state.records.len(),
            row_number_offset: PAGE_SIZE.offset_of(current),
            error_message: state.error.clone(),
        }
    }
}
