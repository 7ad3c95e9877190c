//! Conformity analysis configuration and fixed policy thresholds.
//!
//! The thresholds below are audit policy, not derived from data. They are
//! named here so that reports can display them next to the computed values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Variance (in percentage points) beyond which a digit class is suspicious.
///
/// The comparison is strict: a class at exactly this variance is not flagged.
pub const SUSPICIOUS_VARIANCE_THRESHOLD: f64 = 5.0;

/// p-value at or below which the chi-square test signals significant deviation.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Chi-square critical value for 8 degrees of freedom at alpha = 0.05.
pub const CHI_SQUARE_CRITICAL_FIRST_DIGIT: f64 = 15.51;

/// Chi-square critical value for 89 degrees of freedom at alpha = 0.05.
pub const CHI_SQUARE_CRITICAL_FIRST_TWO_DIGITS: f64 = 112.02;

/// |t| above which the one-sample test reports a deviation in mean percentage.
pub const T_STATISTIC_DEVIATION: f64 = 2.0;

/// Mean absolute variance (percent) below which the fit is considered good.
pub const GOOD_FIT_MAX_MAV: f64 = 1.0;

/// Mean absolute variance (percent) above which the fit is considered anomalous.
pub const ANOMALOUS_FIT_MIN_MAV: f64 = 5.0;

/// Conformity analysis configuration.
///
/// Defaults reproduce the fixed audit policy; overrides exist for hosts that
/// want a tighter or looser screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformityConfig {
    /// Variance threshold in percentage points for suspicious classes
    pub suspicious_variance_threshold: f64,
    /// Chi-square significance level (0.0-1.0, exclusive)
    pub significance_level: f64,
    /// Run the first-two-digit pipeline in addition to the first-digit one
    pub analyze_first_two_digits: bool,
}

/// Validation errors for conformity configuration.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// Threshold is negative or not finite
    #[error("suspicious_variance_threshold must be a finite value >= 0.0, got {0}")]
    InvalidThreshold(f64),
    /// Significance level is outside (0.0, 1.0)
    #[error("significance_level must be between 0.0 and 1.0 (exclusive), got {0}")]
    InvalidSignificance(f64),
}

impl Default for ConformityConfig {
    fn default() -> Self {
        Self {
            suspicious_variance_threshold: SUSPICIOUS_VARIANCE_THRESHOLD,
            significance_level: SIGNIFICANCE_LEVEL,
            analyze_first_two_digits: true,
        }
    }
}

impl ConformityConfig {
    /// Creates a new conformity config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the suspicious variance threshold.
    ///
    /// Negative values are clamped to 0.0 since variance is compared by
    /// absolute value. NaN is kept as is so that `validate()` rejects it.
    pub fn with_suspicious_variance_threshold(mut self, threshold: f64) -> Self {
        if threshold.is_nan() {
            self.suspicious_variance_threshold = threshold;
            return self;
        }
        if threshold < 0.0 {
            tracing::warn!(
                "suspicious_variance_threshold {} clamped to 0.0",
                threshold
            );
        }
        self.suspicious_variance_threshold = threshold.max(0.0);
        self
    }

    /// Builder method to set the chi-square significance level.
    pub fn with_significance_level(mut self, level: f64) -> Self {
        self.significance_level = level;
        self
    }

    /// Builder method to enable/disable the first-two-digit pipeline.
    pub fn with_first_two_digits(mut self, enabled: bool) -> Self {
        self.analyze_first_two_digits = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error if the threshold is negative or non-finite, or if the
    /// significance level is outside (0.0, 1.0).
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let threshold = self.suspicious_variance_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigValidationError::InvalidThreshold(threshold));
        }
        let level = self.significance_level;
        if !(level > 0.0 && level < 1.0) {
            return Err(ConfigValidationError::InvalidSignificance(level));
        }
        Ok(())
    }
}
