//! Input models handed to the engine by the ingestion shell.
//!
//! The engine never parses files. A host loads tabular data however it likes
//! and hands over either a [`RecordSet`] (JSON rows, the shape the `benford`
//! binary reads) or a ready-made [`RawColumn`].

use serde::{Deserialize, Serialize};

use crate::error::{BenfordError, Result};

/// An ordered numeric column, one entry per source record.
///
/// The position of a value is its record identity: flagged values are traced
/// back to records by index. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl RawColumn {
    /// Creates a column from possibly-missing values.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates a column where every record has a value.
    pub fn from_values(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }

    /// Number of source records, missing ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no records.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A set of records loaded from a tabular source, kept as JSON objects.
///
/// Rows keep their load order so that row `i` is the record behind value `i`
/// of any column extracted from the set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    rows: Vec<serde_json::Value>,
}

impl RecordSet {
    /// Wraps already-loaded rows.
    pub fn from_json_rows(rows: Vec<serde_json::Value>) -> Self {
        Self { rows }
    }

    /// Parses a JSON array of record objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| BenfordError::serialization("Failed to parse JSON records", e))?;
        Ok(Self::from_json_rows(rows))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the record at `index`, as loaded.
    pub fn row(&self, index: usize) -> Option<&serde_json::Value> {
        self.rows.get(index)
    }

    /// All column names, in order of first appearance across rows.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for obj in self.rows.iter().filter_map(serde_json::Value::as_object) {
            for key in obj.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }
        names
    }

    /// Candidate columns for analysis.
    ///
    /// A column is numeric when it holds at least one JSON number and every
    /// other value is either a number, `null`, or absent.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| self.is_numeric_column(name))
            .collect()
    }

    /// Extracts a numeric column by name.
    ///
    /// # Errors
    /// `ColumnNotFound` if no row carries the column, `NotNumeric` if it holds
    /// anything other than numbers and nulls.
    pub fn column(&self, name: &str) -> Result<RawColumn> {
        if !self.column_names().iter().any(|n| n == name) {
            return Err(BenfordError::column_not_found(name));
        }
        if !self.is_numeric_column(name) {
            return Err(BenfordError::NotNumeric {
                column: name.to_string(),
            });
        }

        let values = self
            .rows
            .iter()
            .map(|row| {
                row.as_object()
                    .and_then(|obj| obj.get(name))
                    .and_then(serde_json::Value::as_f64)
            })
            .collect();

        Ok(RawColumn::new(name, values))
    }

    /// Picks the requested column, or the first numeric one when none is named.
    ///
    /// # Errors
    /// `NoNumericColumns` when the set offers nothing to analyze; otherwise
    /// the errors of [`RecordSet::column`].
    pub fn select_column(&self, name: Option<&str>) -> Result<RawColumn> {
        let candidates = self.numeric_columns();
        if candidates.is_empty() {
            return Err(BenfordError::NoNumericColumns);
        }

        match name {
            Some(name) => self.column(name),
            None => {
                let first = &candidates[0];
                tracing::debug!("No column requested, defaulting to '{}'", first);
                self.column(first)
            }
        }
    }

    fn is_numeric_column(&self, name: &str) -> bool {
        let mut saw_number = false;
        for row in &self.rows {
            match row.as_object().and_then(|obj| obj.get(name)) {
                None | Some(serde_json::Value::Null) => {}
                Some(serde_json::Value::Number(_)) => saw_number = true,
                Some(_) => return false,
            }
        }
        saw_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_records() -> RecordSet {
        RecordSet::from_json_rows(vec![
            json!({"id": 1, "vendor": "Acme", "amount": 120.5, "note": null}),
            json!({"id": 2, "vendor": "Bolt", "amount": null}),
            json!({"id": 3, "vendor": "Core", "amount": 0}),
            json!({"id": 4, "vendor": "Dyne", "amount": -340}),
        ])
    }

    #[test]
    fn test_numeric_columns_excludes_text_and_null_only() {
        let records = sample_records();
        let numeric = records.numeric_columns();

        assert!(numeric.contains(&"id".to_string()));
        assert!(numeric.contains(&"amount".to_string()));
        assert!(!numeric.contains(&"vendor".to_string()));
        assert!(!numeric.contains(&"note".to_string()));
    }

    #[test]
    fn test_column_keeps_record_alignment() {
        let column = sample_records().column("amount").unwrap();

        assert_eq!(column.name, "amount");
        assert_eq!(
            column.values,
            vec![Some(120.5), None, Some(0.0), Some(-340.0)]
        );
    }

    #[test]
    fn test_column_errors() {
        let records = sample_records();

        assert!(matches!(
            records.column("missing"),
            Err(BenfordError::ColumnNotFound { .. })
        ));
        assert!(matches!(
            records.column("vendor"),
            Err(BenfordError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_select_column_without_numeric_columns() {
        let records = RecordSet::from_json_rows(vec![json!({"name": "Alice"})]);
        assert!(matches!(
            records.select_column(None),
            Err(BenfordError::NoNumericColumns)
        ));

        let empty = RecordSet::default();
        assert!(matches!(
            empty.select_column(Some("amount")),
            Err(BenfordError::NoNumericColumns)
        ));
    }

    #[test]
    fn test_select_column_defaults_to_first_numeric() {
        let column = sample_records().select_column(None).unwrap();
        assert_eq!(column.name, "id");
        assert_eq!(column.len(), 4);

        let records =
            RecordSet::from_json_str(r#"[{"vendor": "Acme", "total": 5, "amount": 3}]"#).unwrap();
        assert_eq!(records.column_names(), vec!["vendor", "total", "amount"]);
        assert_eq!(records.select_column(None).unwrap().name, "total");
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(matches!(
            RecordSet::from_json_str("not json"),
            Err(BenfordError::Serialization { .. })
        ));

        let records = RecordSet::from_json_str(r#"[{"amount": 10}, {"amount": 20}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.row(1), Some(&json!({"amount": 20})));
    }
}
