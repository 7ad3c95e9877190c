//! Value sanitization ahead of digit extraction.
//!
//! Splits a raw column into missing, zero, and valid values. Only valid
//! values reach the digit extractor; the counts are reported so that the
//! presentation layer can show how much of the column was actually analyzed.

use crate::models::RawColumn;

use super::models::{IndexedValue, SanitizationReport, SanitizedColumn};

/// Filters a raw column into the valid analysis set.
///
/// A value is missing when absent or NaN, zero when numerically equal to
/// zero (`-0.0` included), and valid otherwise. Infinite values are valid
/// here and dropped later by the extractor. Source order is preserved.
pub fn sanitize(column: &RawColumn) -> SanitizedColumn {
    let mut values: Vec<IndexedValue> = Vec::with_capacity(column.len());
    let mut report = SanitizationReport {
        total: column.len() as u64,
        ..SanitizationReport::default()
    };

    for (index, raw) in column.values.iter().enumerate() {
        match raw {
            None => {
                report.missing += 1;
                report.missing_indices.push(index);
            }
            Some(value) if value.is_nan() => {
                report.missing += 1;
                report.missing_indices.push(index);
            }
            Some(value) if *value == 0.0 => {
                report.zero += 1;
            }
            Some(value) => {
                values.push(IndexedValue {
                    index,
                    value: *value,
                });
            }
        }
    }

    report.valid = values.len() as u64;

    tracing::debug!(
        "Sanitized column '{}': total={}, missing={}, zero={}, valid={}",
        column.name,
        report.total,
        report.missing,
        report.zero,
        report.valid
    );

    SanitizedColumn { values, report }
}
