// ============================================================
// HEADER ROW
// ============================================================
// Column names taken from the first line of an uploaded file

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Ordered column names of a CSV file.
///
/// Membership checks are exact and case-sensitive. Whatever trimming the
/// header needs has already happened in the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderRow {
    columns: Vec<String>,

    /// Set when the payload was not a list of strings
    #[serde(skip)]
    malformed: bool,
}

impl HeaderRow {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            malformed: false,
        }
    }

    /// Build a header row from an untrusted JSON payload.
    ///
    /// Anything that is not an array yields an empty row. String cells are
    /// kept in order; any other cell marks the whole row malformed, and a
    /// malformed row never satisfies a schema.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Array(cells) => {
                let columns: Vec<String> = cells
                    .iter()
                    .filter_map(|cell| cell.as_str().map(str::to_string))
                    .collect();
                let malformed = columns.len() != cells.len();
                Self { columns, malformed }
            }
            _ => Self {
                columns: Vec::new(),
                malformed: true,
            },
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, header: &str) -> bool {
        self.columns.iter().any(|c| c == header)
    }

    /// Set view used when checking several required headers at once.
    pub fn column_set(&self) -> HashSet<&str> {
        self.columns.iter().map(String::as_str).collect()
    }
}

impl From<Vec<String>> for HeaderRow {
    fn from(columns: Vec<String>) -> Self {
        Self::new(columns)
    }
}

impl From<&[&str]> for HeaderRow {
    fn from(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderRow {
    fn from(columns: [&str; N]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains_is_exact_and_case_sensitive() {
        let row = HeaderRow::from(["Date", "Amount "]);
        assert!(row.contains("Date"));
        assert!(!row.contains("date"));
        assert!(!row.contains("Amount"));
    }

    #[test]
    fn test_from_json_marks_non_string_cells() {
        let row = HeaderRow::from_json(&json!(["伝票日付", 42, null, {"a": 1}, "品名"]));
        assert_eq!(row.columns(), &["伝票日付".to_string(), "品名".to_string()]);
        assert!(row.is_malformed());

        let clean = HeaderRow::from_json(&json!(["伝票日付", "品名"]));
        assert!(!clean.is_malformed());
        assert_eq!(clean, HeaderRow::from(["伝票日付", "品名"]));
    }

    #[test]
    fn test_from_json_non_array_is_empty() {
        for value in [json!("伝票日付,品名"), json!({"headers": []}), JsonValue::Null] {
            let row = HeaderRow::from_json(&value);
            assert!(row.is_empty());
            assert!(row.is_malformed());
        }
        assert!(!HeaderRow::from_json(&json!([])).is_malformed());
    }
}
