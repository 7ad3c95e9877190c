//! Suspicious digit classes and the records behind them.
//!
//! A digit class is suspicious when its observed share deviates from the
//! Benford share by more than a fixed number of percentage points, in either
//! direction. Every record whose value falls in a suspicious class becomes a
//! candidate for review. Being flagged is a statistical observation about the
//! class, never a finding about the individual record.

use super::models::{
    AnomalyFindings, DigitDistribution, ExtractedValue, SuspiciousClass, SuspiciousRecord,
    ValueRange,
};

/// Flags suspicious classes and maps them back to source records.
///
/// # Arguments
/// * `distribution` - Observed distribution of the pipeline
/// * `extracted` - Valid values with their extracted digit classes
/// * `total_rows` - Records in the source column, used for the flagged percentage
/// * `threshold` - Variance threshold in percentage points (strict comparison)
pub fn classify(
    distribution: &DigitDistribution,
    extracted: &[ExtractedValue],
    total_rows: u64,
    threshold: f64,
) -> AnomalyFindings {
    let pipeline = distribution.pipeline;

    let suspicious_classes: Vec<SuspiciousClass> = distribution
        .classes
        .iter()
        .filter(|c| c.variance.abs() > threshold)
        .map(|c| SuspiciousClass {
            digit: c.digit,
            variance: c.variance,
        })
        .collect();

    let records: Vec<SuspiciousRecord> = if suspicious_classes.is_empty() {
        Vec::new()
    } else {
        extracted
            .iter()
            .filter_map(|e| {
                let digit = e.digits.class_for(pipeline)?;
                suspicious_classes
                    .iter()
                    .any(|c| c.digit == digit)
                    .then_some(SuspiciousRecord {
                        index: e.index,
                        value: e.value,
                        digit,
                    })
            })
            .collect()
    };

    let flagged_count = records.len() as u64;
    let flagged_percent = if total_rows == 0 {
        0.0
    } else {
        flagged_count as f64 / total_rows as f64 * 100.0
    };

    if !suspicious_classes.is_empty() {
        tracing::info!(
            "{}: {} suspicious class(es), {} record(s) flagged ({:.2}%)",
            pipeline,
            suspicious_classes.len(),
            flagged_count,
            flagged_percent
        );
    }

    AnomalyFindings {
        threshold,
        suspicious_classes,
        value_range: value_range(&records),
        records,
        flagged_count,
        flagged_percent,
    }
}

/// Min/max of the flagged values, or `None` when nothing is flagged.
fn value_range(records: &[SuspiciousRecord]) -> Option<ValueRange> {
    let first = records.first()?.value;
    Some(records.iter().fold(
        ValueRange {
            min: first,
            max: first,
        },
        |range, r| ValueRange {
            min: range.min.min(r.value),
            max: range.max.max(r.value),
        },
    ))
}

impl AnomalyFindings {
    /// Flagged records whose value lies in `[min, max]`, in source order.
    ///
    /// Backs the range filter of the presentation layer; an inverted range
    /// selects nothing.
    pub fn records_in_range(&self, min: f64, max: f64) -> Vec<SuspiciousRecord> {
        self.records
            .iter()
            .filter(|r| r.value >= min && r.value <= max)
            .copied()
            .collect()
    }
}
