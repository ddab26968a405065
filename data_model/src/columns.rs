//! Display columns of the record table.

use derive_more::Display;
use getset::CopyGetters;

/// How a column value is presented.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Plain text
    #[display(fmt = "text")]
    Text,
    /// Phone number
    #[display(fmt = "phone")]
    Phone,
    /// Timestamp, shown as `Mon DD, YYYY HH:MM`
    #[display(fmt = "date")]
    Date,
}

/// One column of the record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Column {
    /// Header shown to the user
    label: &'static str,
    /// Row field rendered in this column
    field_name: &'static str,
    /// Presentation of the value
    kind: ColumnKind,
}

impl Column {
    /// Constructs [`Column`].
    pub const fn new(label: &'static str, field_name: &'static str, kind: ColumnKind) -> Self {
        Self {
            label,
            field_name,
            kind,
        }
    }
}

/// Columns of the account table. Rows are expected to carry at least these fields.
pub const ACCOUNT_COLUMNS: [Column; 4] = [
    Column::new("Account Name", "Name", ColumnKind::Text),
    Column::new("Industry", "Industry", ColumnKind::Text),
    Column::new("Phone", "Phone", ColumnKind::Phone),
    Column::new("Created Date", "CreatedDate", ColumnKind::Date),
];
