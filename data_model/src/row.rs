//! Display rows returned by a record source.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::columns::Column;

/// Record returned by a record source.
///
/// The schema belongs to the record source; the client only looks fields up
/// by name to display them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Look a field up by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Text shown in the cell of `column`. Missing and `null` fields render empty.
    pub fn cell(&self, column: &Column) -> String {
        match self.field(column.field_name()) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::columns::ACCOUNT_COLUMNS;

    #[test]
    fn cells_follow_account_columns() {
        let row: Row = [
            ("Name", json!("Acme")),
            ("Industry", Value::Null),
            ("Phone", json!("555-0100")),
            ("NumberOfEmployees", json!(42)),
        ]
        .into_iter()
        .collect();

        let cells: Vec<String> = ACCOUNT_COLUMNS.iter().map(|c| row.cell(c)).collect();
        assert_eq!(cells, vec!["Acme", "", "555-0100", ""]);
        assert_eq!(row.field("NumberOfEmployees"), Some(&json!(42)));
    }

    #[test]
    fn deserializes_from_plain_object() {
        let row: Row = serde_json::from_value(json!({ "Id": "001", "Name": "Acme" })).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.field("Id"), Some(&json!("001")));
    }
}
