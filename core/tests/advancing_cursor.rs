use std::{sync::Arc, time::Duration};

use page_cursor_client::prelude::*;
use page_cursor_core::prelude::*;
use page_cursor_data_model::prelude::*;
use page_cursor_logger::test_logger;

fn client(records: usize) -> (Arc<RecordSource>, AdvancingIndexCursorClient<AdvancingSource>) {
    let _logger = test_logger();
    let source = Arc::new(RecordSource::new(RecordSet::accounts(records)));
    let client = AdvancingIndexCursorClient::new(source.advancing());
    (source, client)
}

fn names(client: &impl PageCursorClient) -> Vec<String> {
    client
        .records()
        .iter()
        .map(|row| row.cell(&ACCOUNT_COLUMNS[0]))
        .collect()
}

#[tokio::test]
async fn forward_scan_sees_every_live_row_once() {
    let (source, client) = client(35);
    client.initialize().await;
    let mut seen = names(&client);

    for position in [4, 15, 16, 33] {
        source.delete(position);
    }
    let mut deleted = 0;
    while client.go_next().await == Navigation::Loaded {
        seen.extend(names(&client));
        deleted += client.progress().deleted_rows;
    }

    assert_eq!(deleted, 3, "row 4 was read before it was deleted");
    assert_eq!(seen.len(), 32);
    assert!(seen.contains(&"Account 005".to_owned()));
    assert!(!seen.contains(&"Account 016".to_owned()));
    let mut unique = seen.clone();
    unique.dedup();
    assert_eq!(unique, seen);
    assert_eq!(client.ledger().len(), client.current_page() as usize);
}

#[tokio::test]
async fn going_back_lands_where_the_page_started() {
    let (source, client) = client(30);
    client.initialize().await;
    source.delete(12);
    source.delete(13);

    client.go_next().await;
    let second_page = names(&client);
    let view = client.view();
    assert_eq!(
        view.deleted_rows_info.as_deref(),
        Some("2 deleted rows skipped on this page")
    );
    assert_eq!(view.record_count_info, "28 total records");

    client.go_next().await;
    assert_eq!(client.ledger().as_slice(), &[0, 10, 22]);

    assert_eq!(client.go_previous().await, Navigation::Loaded);
    assert_eq!(client.current_page(), 2);
    assert_eq!(names(&client), second_page);
}

#[tokio::test]
async fn last_page_is_approximated_after_deletes() {
    let (source, client) = client(25);
    client.initialize().await;
    source.delete(2);

    assert_eq!(client.go_last().await, Navigation::Loaded);
    assert_eq!(client.current_page(), 3);
    // the jump does not know about the deleted row before it
    assert_eq!(names(&client)[0], "Account 021");
    assert_eq!(client.estimated_total_pages(), 3);
    assert_eq!(client.ledger().as_slice(), &[0]);

    assert_eq!(client.go_previous().await, Navigation::Loaded);
    assert_eq!(client.current_page(), 2);
    assert_eq!(names(&client)[0], "Account 011");
    assert_eq!(client.view().tracked_pages_info.as_deref(), Some("1 page indices tracked"));
}

#[tokio::test]
async fn failure_then_recovery() {
    let (source, client) = client(25);
    client.initialize().await;
    let before = client.records();

    source.fail_next(Failure::from_json(serde_json::json!({
        "message": "Insufficient access"
    })));
    assert_eq!(client.go_next().await, Navigation::Failed);
    assert_eq!(client.records(), before);
    assert_eq!(client.error_message().as_deref(), Some("Insufficient access"));

    assert_eq!(client.go_next().await, Navigation::Loaded);
    assert_eq!(client.current_page(), 2);
    assert_eq!(client.ledger().as_slice(), &[0, 10]);
}

#[tokio::test]
async fn expired_cursor_surfaces_as_error() {
    let _logger = test_logger();
    let source = Arc::new(
        RecordSource::new(RecordSet::accounts(25)).with_idle_time(Duration::ZERO),
    );
    let client = AdvancingIndexCursorClient::new(source.advancing());
    client.initialize().await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(client.go_next().await, Navigation::Failed);
    assert_eq!(client.error_message().as_deref(), Some("Unknown cursor"));

    assert_eq!(client.initialize().await, Navigation::Loaded);
    assert_eq!(client.error_message(), None);
    assert_eq!(client.ledger().as_slice(), &[0]);
}

#[tokio::test]
async fn timeout_wrapper_passes_pages_through() {
    let _logger = test_logger();
    let source = Arc::new(RecordSource::new(RecordSet::accounts(12)));
    let client = AdvancingIndexCursorClient::new(Timeout::new(
        source.advancing(),
        Some(Duration::from_secs(5)),
    ));

    assert_eq!(client.initialize().await, Navigation::Loaded);
    assert_eq!(client.go_last().await, Navigation::Loaded);
    assert_eq!(client.records().len(), 2);
}
