//! Scripted record source for unit tests.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use page_cursor_data_model::prelude::*;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

use crate::{
    error::{ApplicationFailure, Failure, TransportFailure},
    transport::CursorTransport,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init,
    GetPage(CursorToken, PageRequest),
}

/// Answers calls from a queue of replies, in order.
pub struct Scripted<P> {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Result<P, Failure>>>,
    gate: Option<Arc<Notify>>,
}

impl<P> Scripted<P> {
    pub fn new(replies: impl IntoIterator<Item = Result<P, Failure>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().collect()),
            gate: None,
        }
    }

    /// Hold every reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push(&self, reply: Result<P, Failure>) {
        self.replies.lock().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn last_request(&self) -> Option<PageRequest> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            Call::GetPage(_, request) => Some(*request),
            Call::Init => None,
        })
    }

    async fn reply(&self, call: Call) -> Result<P, Failure> {
        self.calls.lock().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(Failure::Application(ApplicationFailure::Text(
                "no scripted reply".to_owned(),
            )))
        })
    }
}

#[async_trait]
impl<P: Send> CursorTransport for Scripted<P> {
    type Page = P;

    async fn init(&self) -> Result<P, Failure> {
        self.reply(Call::Init).await
    }

    async fn get_page(&self, cursor: &CursorToken, request: PageRequest) -> Result<P, Failure> {
        self.reply(Call::GetPage(cursor.clone(), request)).await
    }
}

pub fn rows(first: u64, count: u64) -> Vec<Row> {
    (first..first + count)
        .map(|n| [("Name", json!(format!("Account {n}")))].into_iter().collect())
        .collect()
}

pub fn standard_page(cursor: &str, page: u32, total_records: u64) -> StandardPage {
    let size = PageSize::DEFAULT;
    let first = size.offset_of(page);
    let count = total_records
        .saturating_sub(first)
        .min(u64::from(size.get()));
    PageResult {
        cursor: CursorToken::issue(cursor),
        records: rows(first, count),
        current_page: page,
        progress: Totals {
            total_pages: size.pages_for(total_records),
            total_records,
        },
    }
}

pub fn advancing_page(
    cursor: &str,
    page: u32,
    records: u64,
    progress: ScanProgress,
) -> AdvancingPage {
    PageResult {
        cursor: CursorToken::issue(cursor),
        records: rows(0, records),
        current_page: page,
        progress,
    }
}

pub fn progress(
    total_records: u64,
    next_index: u64,
    deleted_rows: u64,
    has_more_pages: bool,
) -> ScanProgress {
    ScanProgress {
        total_records,
        next_index,
        deleted_rows,
        has_more_pages,
    }
}

pub fn network_failure() -> Failure {
    Failure::Transport(TransportFailure::with_body(Some(503), "Service unavailable"))
}
