//! Rows held by the in-memory record source.

use page_cursor_data_model::prelude::Row;
use serde_json::json;

const INDUSTRIES: [&str; 5] = [
    "Agriculture",
    "Banking",
    "Energy",
    "Technology",
    "Transportation",
];

#[derive(Debug, Clone)]
struct Record {
    row: Row,
    deleted: bool,
}

/// Rows in storage order. Deleting marks a row, positions never shift.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Constructs [`RecordSet`] from `rows` in storage order.
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            records: rows
                .into_iter()
                .map(|row| Record {
                    row,
                    deleted: false,
                })
                .collect(),
        }
    }

    /// `count` generated accounts carrying every account table field.
    pub fn accounts(count: usize) -> Self {
        Self::new((0..count).map(account))
    }

    /// Mark the row at `position` deleted. Returns `false` if there is no such
    /// row or it was already deleted.
    pub fn delete(&mut self, position: usize) -> bool {
        match self.records.get_mut(position) {
            Some(record) if !record.deleted => {
                record.deleted = true;
                true
            }
            _ => false,
        }
    }

    /// Live row at `position`.
    pub fn live(&self, position: usize) -> Option<&Row> {
        self.records
            .get(position)
            .filter(|record| !record.deleted)
            .map(|record| &record.row)
    }

    /// Number of stored rows, deleted ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing was ever stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows not deleted.
    pub fn live_count(&self) -> usize {
        self.records.iter().filter(|record| !record.deleted).count()
    }

    /// Positions of the rows not deleted.
    pub fn live_positions(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.deleted)
            .map(|(position, _)| position)
            .collect()
    }
}

fn account(n: usize) -> Row {
    let number = n + 1;
    [
        ("Id", json!(format!("001{number:015}"))),
        ("Name", json!(format!("Account {number:03}"))),
        ("Industry", json!(INDUSTRIES[n % INDUSTRIES.len()])),
        ("Phone", json!(format!("(555) 010-{:04}", number % 10_000))),
        (
            "CreatedDate",
            json!(format!(
                "2024-{:02}-{:02}T09:00:00.000Z",
                n / 28 % 12 + 1,
                n % 28 + 1
            )),
        ),
    ]
    .into_iter()
    .collect()
}
