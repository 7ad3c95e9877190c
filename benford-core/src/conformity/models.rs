//! Conformity analysis result models.
//!
//! Every type here is an immutable output of a single analysis run. Nothing
//! is updated incrementally: analyzing another column builds a new report.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::{
    ANOMALOUS_FIT_MIN_MAV, CHI_SQUARE_CRITICAL_FIRST_DIGIT, CHI_SQUARE_CRITICAL_FIRST_TWO_DIGITS,
    GOOD_FIT_MAX_MAV,
};

/// The digit position a pipeline aggregates on.
///
/// Both pipelines share one implementation; they differ only in the class
/// range they cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitPipeline {
    /// Classes 1-9
    FirstDigit,
    /// Classes 10-99
    FirstTwoDigits,
}

impl DigitPipeline {
    /// Both pipelines, in reporting order.
    pub const ALL: [Self; 2] = [Self::FirstDigit, Self::FirstTwoDigits];

    /// Lowest digit class of the pipeline.
    pub const fn low(self) -> u8 {
        match self {
            Self::FirstDigit => 1,
            Self::FirstTwoDigits => 10,
        }
    }

    /// Highest digit class of the pipeline.
    pub const fn high(self) -> u8 {
        match self {
            Self::FirstDigit => 9,
            Self::FirstTwoDigits => 99,
        }
    }

    /// The inclusive class range `[low, high]`.
    pub const fn classes(self) -> RangeInclusive<u8> {
        self.low()..=self.high()
    }

    /// Number of digit classes.
    pub const fn class_count(self) -> usize {
        (self.high() - self.low()) as usize + 1
    }

    /// Returns true if `digit` belongs to this pipeline's range.
    pub const fn contains(self, digit: u8) -> bool {
        digit >= self.low() && digit <= self.high()
    }

    /// Chi-square degrees of freedom (classes - 1).
    pub const fn degrees_of_freedom(self) -> usize {
        self.class_count() - 1
    }

    /// Reference chi-square critical value at alpha = 0.05, for display.
    pub const fn critical_chi_square(self) -> f64 {
        match self {
            Self::FirstDigit => CHI_SQUARE_CRITICAL_FIRST_DIGIT,
            Self::FirstTwoDigits => CHI_SQUARE_CRITICAL_FIRST_TWO_DIGITS,
        }
    }
}

impl fmt::Display for DigitPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstDigit => write!(f, "first-digit"),
            Self::FirstTwoDigits => write!(f, "first-two-digit"),
        }
    }
}

/// Row counts produced by the sanitizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationReport {
    /// Records in the column
    pub total: u64,
    /// Missing values (absent or NaN)
    pub missing: u64,
    /// Values numerically equal to zero
    pub zero: u64,
    /// Values kept for analysis
    pub valid: u64,
    /// Record indices of missing values
    pub missing_indices: Vec<usize>,
}

/// A valid value with its source record index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexedValue {
    /// Record index in the source column
    pub index: usize,
    /// Non-zero value
    pub value: f64,
}

/// Sanitizer output: the analysis set plus its counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedColumn {
    /// Valid values in record order
    pub values: Vec<IndexedValue>,
    /// Counts over the whole column
    pub report: SanitizationReport,
}

/// Digit classes extracted from one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DigitExtraction {
    /// The value has an integer magnitude of at least 1
    Digits {
        /// Leading digit (1-9)
        first: u8,
        /// Absent when the integer magnitude has a single digit
        first_two: Option<u8>,
    },
    /// `|value| < 1`: truncation leaves no leading digit
    OutOfDomain,
    /// The magnitude is not finite
    Malformed,
}

impl DigitExtraction {
    /// The digit class this extraction contributes to `pipeline`, if any.
    pub const fn class_for(&self, pipeline: DigitPipeline) -> Option<u8> {
        match (self, pipeline) {
            (Self::Digits { first, .. }, DigitPipeline::FirstDigit) => Some(*first),
            (Self::Digits { first_two, .. }, DigitPipeline::FirstTwoDigits) => *first_two,
            _ => None,
        }
    }
}

/// A valid value together with its extracted digit classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedValue {
    /// Record index in the source column
    pub index: usize,
    /// Original value
    pub value: f64,
    /// Extracted digit classes
    pub digits: DigitExtraction,
}

/// Aggregate extraction counts over the valid set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Values contributing to the first-digit pipeline
    pub first_digit: u64,
    /// Values contributing to the first-two-digit pipeline
    pub first_two_digits: u64,
    /// Valid values with `|value| < 1`
    pub out_of_domain: u64,
    /// Valid values whose magnitude is not finite
    pub malformed: u64,
}

/// Observed vs. theoretical frequency of one digit class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitClassStats {
    /// Digit class
    pub digit: u8,
    /// Occurrences of the class
    pub count: u64,
    /// Observed fraction (0.0-1.0)
    pub observed: f64,
    /// Benford fraction `log10(1 + 1/d)`
    pub expected: f64,
    /// `(observed - expected) * 100`, in percentage points
    pub variance: f64,
}

impl DigitClassStats {
    /// Observed frequency in percent.
    pub fn observed_percent(&self) -> f64 {
        self.observed * 100.0
    }

    /// Benford frequency in percent.
    pub fn expected_percent(&self) -> f64 {
        self.expected * 100.0
    }

    /// Count implied by the Benford distribution for `total` values.
    pub fn expected_count(&self, total: u64) -> f64 {
        self.expected * total as f64
    }
}

/// Observed digit distribution of one pipeline, paired with Benford's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitDistribution {
    /// Pipeline the classes belong to
    pub pipeline: DigitPipeline,
    /// Number of extracted classes (never zero)
    pub total: u64,
    /// One entry per class of the pipeline range, in ascending order
    pub classes: Vec<DigitClassStats>,
}

impl DigitDistribution {
    /// Looks up the stats of one digit class.
    pub fn class(&self, digit: u8) -> Option<&DigitClassStats> {
        if !self.pipeline.contains(digit) {
            return None;
        }
        self.classes.get(usize::from(digit - self.pipeline.low()))
    }

    /// `mean(|variance|)` across all classes, in percent.
    pub fn mean_absolute_variance(&self) -> f64 {
        if self.classes.is_empty() {
            return 0.0;
        }
        self.classes.iter().map(|c| c.variance.abs()).sum::<f64>() / self.classes.len() as f64
    }
}

/// Statistic and p-value of one test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test statistic
    pub statistic: f64,
    /// Two-sided p-value for the t-test, upper tail for chi-square
    pub p_value: f64,
}

/// Coarse fit-quality band from the mean absolute variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitQuality {
    /// Below 1%
    Good,
    /// Between 1% and 5% inclusive
    Acceptable,
    /// Above 5%, likely localized anomalies
    Anomalous,
}

impl FitQuality {
    /// Classifies a mean absolute variance (percent).
    pub fn from_mean_absolute_variance(mav: f64) -> Self {
        if mav < GOOD_FIT_MAX_MAV {
            Self::Good
        } else if mav > ANOMALOUS_FIT_MIN_MAV {
            Self::Anomalous
        } else {
            Self::Acceptable
        }
    }
}

impl fmt::Display for FitQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Acceptable => write!(f, "acceptable"),
            Self::Anomalous => write!(f, "anomalous"),
        }
    }
}

/// Results of both conformity tests for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformityTests {
    /// Chi-square goodness-of-fit against Benford counts
    pub chi_square: TestResult,
    /// Class count minus one
    pub degrees_of_freedom: usize,
    /// Reference critical value at alpha = 0.05 (display only)
    pub critical_value: f64,
    /// One-sample t-test of class percentages against the mean Benford percentage
    pub one_sample: TestResult,
    /// Mean absolute variance in percent
    pub mean_absolute_variance: f64,
    /// Band of the mean absolute variance
    pub fit_quality: FitQuality,
}

/// Policy verdicts derived from the test results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Chi-square p-value at or below the significance level
    pub chi_square_significant: bool,
    /// |t| above the deviation threshold
    pub mean_deviation: bool,
    /// Band of the mean absolute variance
    pub fit_quality: FitQuality,
}

/// A digit class flagged by the variance threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousClass {
    /// Digit class
    pub digit: u8,
    /// Signed variance in percentage points
    pub variance: f64,
}

/// A source record whose digit class is suspicious.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousRecord {
    /// Record index in the source column
    pub index: usize,
    /// Original value, kept for range filtering
    pub value: f64,
    /// Suspicious class the record falls in
    pub digit: u8,
}

/// Bounds of the flagged values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest flagged value
    pub min: f64,
    /// Largest flagged value
    pub max: f64,
}

impl ValueRange {
    /// Returns true if all flagged values are equal, so a range filter has
    /// nothing to narrow.
    pub fn is_single_value(&self) -> bool {
        self.min == self.max
    }

    /// Returns true if `value` lies within the bounds (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Output of the anomaly classifier for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFindings {
    /// Threshold used, in percentage points
    pub threshold: f64,
    /// Flagged classes in ascending digit order
    pub suspicious_classes: Vec<SuspiciousClass>,
    /// Flagged records in source order
    pub records: Vec<SuspiciousRecord>,
    /// Number of flagged records
    pub flagged_count: u64,
    /// Flagged records as a percentage of all rows in the column
    pub flagged_percent: f64,
    /// `None` when nothing is flagged
    pub value_range: Option<ValueRange>,
}

impl AnomalyFindings {
    /// Returns true if no class exceeded the threshold.
    pub fn is_empty(&self) -> bool {
        self.suspicious_classes.is_empty()
    }

    /// Returns true if `digit` was flagged.
    pub fn is_suspicious(&self, digit: u8) -> bool {
        self.suspicious_classes.iter().any(|c| c.digit == digit)
    }
}

/// Everything computed for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Observed vs. expected class shares
    pub distribution: DigitDistribution,
    /// Goodness-of-fit results
    pub tests: ConformityTests,
    /// Verdicts derived from the tests
    pub risk: RiskAssessment,
    /// Suspicious classes and records
    pub anomalies: AnomalyFindings,
}

/// Result state of one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The pipeline had data and was fully analyzed
    Analyzed(Box<PipelineReport>),
    /// No value produced a class for this pipeline
    EmptyAnalysisSet {
        /// Pipeline without data
        pipeline: DigitPipeline,
    },
    /// The pipeline was switched off by configuration
    Skipped {
        /// Disabled pipeline
        pipeline: DigitPipeline,
    },
}

impl PipelineOutcome {
    /// The report, if the pipeline was analyzed.
    pub fn report(&self) -> Option<&PipelineReport> {
        match self {
            Self::Analyzed(report) => Some(report),
            _ => None,
        }
    }

    /// Returns true if the pipeline had nothing to analyze.
    pub fn is_empty_analysis_set(&self) -> bool {
        matches!(self, Self::EmptyAnalysisSet { .. })
    }
}

/// Complete conformity results for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformityReport {
    /// Analyzed column
    pub column_name: String,
    /// Missing/zero/valid counts
    pub sanitization: SanitizationReport,
    /// Out-of-domain and malformed counts
    pub extraction: ExtractionSummary,
    /// First-digit pipeline result
    pub first_digit: PipelineOutcome,
    /// First-two-digit pipeline result
    pub first_two_digits: PipelineOutcome,
    /// Timestamp when analysis was performed
    pub analyzed_at: DateTime<Utc>,
}

impl ConformityReport {
    /// The outcome of the given pipeline.
    pub fn pipeline(&self, pipeline: DigitPipeline) -> &PipelineOutcome {
        match pipeline {
            DigitPipeline::FirstDigit => &self.first_digit,
            DigitPipeline::FirstTwoDigits => &self.first_two_digits,
        }
    }
}
