//! Conformity analyzer facade.
//!
//! This module provides the main `BenfordAnalyzer` that runs the full
//! pipeline (sanitize, extract, distribute, test, classify) for both digit
//! pipelines and assembles a `ConformityReport`.

use chrono::Utc;

use crate::Result;
use crate::error::BenfordError;
use crate::models::{RawColumn, RecordSet};

use super::anomaly::classify;
use super::config::ConformityConfig;
use super::digits::extract_all;
use super::models::{
    ConformityReport, DigitDistribution, DigitPipeline, ExtractedValue, PipelineOutcome,
    PipelineReport,
};
use super::sanitize::sanitize;
use super::significance::{assess_risk, run_conformity_tests};

/// Analyzer for Benford's Law conformity.
///
/// The analyzer holds only its configuration, so one instance can serve any
/// number of columns, including concurrently from several threads.
///
/// # Example
///
/// ```rust
/// use benford_core::{BenfordAnalyzer, RawColumn};
///
/// let column = RawColumn::from_values("amount", [100.0, 200.0, 300.0, 400.0]);
/// let report = BenfordAnalyzer::with_defaults().analyze(&column).unwrap();
///
/// assert_eq!(report.sanitization.valid, 4);
/// assert!(report.first_digit.report().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct BenfordAnalyzer {
    config: ConformityConfig,
}

impl BenfordAnalyzer {
    /// Creates a new analyzer with the given configuration.
    ///
    /// # Errors
    /// `Configuration` if the configuration does not validate.
    pub fn new(config: ConformityConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| BenfordError::configuration(e.to_string()))?;
        Ok(Self { config })
    }

    /// Creates a new analyzer with the default audit policy.
    pub fn with_defaults() -> Self {
        Self {
            config: ConformityConfig::default(),
        }
    }

    /// Returns a reference to the analyzer configuration.
    pub fn config(&self) -> &ConformityConfig {
        &self.config
    }

    /// Analyzes one numeric column.
    ///
    /// A pipeline without extractable values is reported as
    /// `PipelineOutcome::EmptyAnalysisSet` rather than failing the run, so
    /// a column of single-digit values still gets its first-digit analysis.
    ///
    /// # Errors
    /// `Statistics` if a conformity test cannot be computed.
    pub fn analyze(&self, column: &RawColumn) -> Result<ConformityReport> {
        tracing::debug!(
            "Analyzing column '{}' ({} records)",
            column.name,
            column.len()
        );

        let sanitized = sanitize(column);
        let (extracted, extraction) = extract_all(&sanitized);
        let total_rows = sanitized.report.total;

        let first_digit = self.run_pipeline(DigitPipeline::FirstDigit, &extracted, total_rows)?;
        let first_two_digits = if self.config.analyze_first_two_digits {
            self.run_pipeline(DigitPipeline::FirstTwoDigits, &extracted, total_rows)?
        } else {
            PipelineOutcome::Skipped {
                pipeline: DigitPipeline::FirstTwoDigits,
            }
        };

        Ok(ConformityReport {
            column_name: column.name.clone(),
            sanitization: sanitized.report,
            extraction,
            first_digit,
            first_two_digits,
            analyzed_at: Utc::now(),
        })
    }

    /// Selects a column from a record set and analyzes it.
    ///
    /// With `column` set to `None` the first numeric column is used.
    ///
    /// # Errors
    /// `NoNumericColumns` before any computation when the set has nothing to
    /// analyze, or the column selection errors of [`RecordSet::select_column`].
    pub fn analyze_records(
        &self,
        records: &RecordSet,
        column: Option<&str>,
    ) -> Result<ConformityReport> {
        let column = records.select_column(column)?;
        self.analyze(&column)
    }

    /// Runs one digit pipeline over the extracted values.
    fn run_pipeline(
        &self,
        pipeline: DigitPipeline,
        extracted: &[ExtractedValue],
        total_rows: u64,
    ) -> Result<PipelineOutcome> {
        let classes: Vec<u8> = extracted
            .iter()
            .filter_map(|e| e.digits.class_for(pipeline))
            .collect();

        let distribution = match DigitDistribution::build(pipeline, &classes) {
            Ok(distribution) => distribution,
            Err(e) if e.is_empty_analysis_set() => {
                tracing::warn!("{}", e);
                return Ok(PipelineOutcome::EmptyAnalysisSet { pipeline });
            }
            Err(e) => return Err(e),
        };

        let tests = run_conformity_tests(&distribution)?;
        let risk = assess_risk(&tests, self.config.significance_level);
        let anomalies = classify(
            &distribution,
            extracted,
            total_rows,
            self.config.suspicious_variance_threshold,
        );

        Ok(PipelineOutcome::Analyzed(Box::new(PipelineReport {
            distribution,
            tests,
            risk,
            anomalies,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformity::models::FitQuality;
    use serde_json::json;

    #[test]
    fn test_analyzer_rejects_invalid_config() {
        let config = ConformityConfig::new().with_significance_level(2.0);
        assert!(matches!(
            BenfordAnalyzer::new(config),
            Err(BenfordError::Configuration { .. })
        ));
    }

    #[test]
    fn test_analyze_empty_column() {
        let report = BenfordAnalyzer::with_defaults()
            .analyze(&RawColumn::new("empty", Vec::new()))
            .unwrap();

        assert_eq!(report.sanitization.total, 0);
        assert!(report.first_digit.is_empty_analysis_set());
        assert!(report.first_two_digits.is_empty_analysis_set());
    }

    #[test]
    fn test_analyze_single_digit_values() {
        let column = RawColumn::from_values("small", [1.0, 2.0, 3.0, 4.0, 5.0]);
        let report = BenfordAnalyzer::with_defaults().analyze(&column).unwrap();

        assert!(report.first_digit.report().is_some());
        assert!(report.first_two_digits.is_empty_analysis_set());
        assert_eq!(report.extraction.first_digit, 5);
        assert_eq!(report.extraction.first_two_digits, 0);
    }

    #[test]
    fn test_analyze_skips_first_two_when_disabled() {
        let analyzer =
            BenfordAnalyzer::new(ConformityConfig::new().with_first_two_digits(false)).unwrap();
        let column = RawColumn::from_values("amount", [120.0, 340.0]);

        let report = analyzer.analyze(&column).unwrap();
        assert!(matches!(
            report.first_two_digits,
            PipelineOutcome::Skipped {
                pipeline: DigitPipeline::FirstTwoDigits
            }
        ));
    }

    #[test]
    fn test_analyze_uniform_column() {
        let column = RawColumn::from_values("amount", (1..=9).map(|d| f64::from(d) * 100.0));
        let report = BenfordAnalyzer::with_defaults().analyze(&column).unwrap();

        let first = report.first_digit.report().unwrap();
        assert_eq!(first.distribution.total, 9);
        assert_eq!(first.tests.fit_quality, FitQuality::Anomalous);
        // Digit 1 is under-represented by about 19 points, digits 7-9 over by 5+
        assert!(first.anomalies.is_suspicious(1));
        assert!(first.anomalies.is_suspicious(9));
        assert!(!first.anomalies.is_suspicious(3));
    }

    #[test]
    fn test_analyze_records_selects_column() {
        let records = RecordSet::from_json_rows(vec![
            json!({"invoice": "A-1", "amount": 1200}),
            json!({"invoice": "A-2", "amount": 310}),
            json!({"invoice": "A-3", "amount": null}),
        ]);

        let report = BenfordAnalyzer::with_defaults()
            .analyze_records(&records, Some("amount"))
            .unwrap();
        assert_eq!(report.column_name, "amount");
        assert_eq!(report.sanitization.missing, 1);
        assert_eq!(report.sanitization.missing_indices, vec![2]);

        let text_only = RecordSet::from_json_rows(vec![json!({"invoice": "A-1"})]);
        assert!(matches!(
            BenfordAnalyzer::with_defaults().analyze_records(&text_only, None),
            Err(BenfordError::NoNumericColumns)
        ));
    }

    #[test]
    fn test_analyzer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BenfordAnalyzer>();
    }
}
