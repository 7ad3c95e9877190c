//! Benford's Law conformity engine.
//!
//! This module evaluates a numeric column against the Benford distribution:
//! - **Sanitization**: drop missing and zero values, report the counts
//! - **Digit extraction**: first-digit (1-9) and first-two-digit (10-99) classes
//! - **Distribution**: observed vs. theoretical frequencies and their variance
//! - **Conformity tests**: chi-square goodness of fit and a one-sample t-test
//! - **Anomaly classification**: suspicious classes and the records behind them
//!
//! Both digit pipelines share one implementation parametrized by
//! [`DigitPipeline`].
//!
//! # Example
//! ```rust
//! use benford_core::conformity::{BenfordAnalyzer, ConformityConfig};
//! use benford_core::RawColumn;
//!
//! let analyzer = BenfordAnalyzer::new(ConformityConfig::default()).unwrap();
//! let column = RawColumn::from_values("amount", [1200.0, 180.0, 25.0, 3400.0]);
//! let report = analyzer.analyze(&column).unwrap();
//!
//! if let Some(first) = report.first_digit.report() {
//!     println!("chi2 p-value: {:.4}", first.tests.chi_square.p_value);
//! }
//! ```

mod analyzer;
mod anomaly;
pub mod config;
mod digits;
mod distribution;
mod models;
mod sanitize;
mod significance;

// Re-export public API
pub use analyzer::BenfordAnalyzer;
pub use anomaly::classify;
pub use config::{ConfigValidationError, ConformityConfig};
pub use digits::{extract, extract_all};
pub use distribution::{theoretical_distribution, theoretical_fraction};
pub use models::{
    AnomalyFindings, ConformityReport, ConformityTests, DigitClassStats, DigitDistribution,
    DigitExtraction, DigitPipeline, ExtractedValue, ExtractionSummary, FitQuality, IndexedValue,
    PipelineOutcome, PipelineReport, RiskAssessment, SanitizationReport, SanitizedColumn,
    SuspiciousClass, SuspiciousRecord, TestResult, ValueRange,
};
pub use sanitize::sanitize;
pub use significance::{assess_risk, chi_square_test, one_sample_t_test, run_conformity_tests};
