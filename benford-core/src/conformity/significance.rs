//! Conformity tests against the Benford distribution.
//!
//! Two tests run per pipeline:
//!
//! - **Chi-square goodness of fit** over class counts, with `classes - 1`
//!   degrees of freedom. This is the primary signal.
//! - **One-sample t-test** treating the per-class observed percentages as a
//!   sample and testing its mean against the mean Benford percentage. This
//!   is not a test over the underlying data: because observed and expected
//!   percentages both sum to 100, the two means agree by construction and
//!   the statistic mostly reflects rounding noise. It is reported for parity
//!   with established audit worksheets and must not be read as rigorous.

use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};

use crate::error::{BenfordError, Result};

use super::config::T_STATISTIC_DEVIATION;
use super::models::{ConformityTests, DigitDistribution, FitQuality, RiskAssessment, TestResult};

/// Spread below this is treated as a constant sample.
const SPREAD_NOISE_FLOOR: f64 = 1e-12;

/// Mean differences below this are treated as equal means.
const MEAN_NOISE_FLOOR: f64 = 1e-9;

/// Runs both conformity tests and the mean-absolute-variance summary.
///
/// # Errors
/// `Statistics` if a reference distribution cannot be built, which only
/// happens for a distribution with fewer than two classes.
pub fn run_conformity_tests(distribution: &DigitDistribution) -> Result<ConformityTests> {
    let pipeline = distribution.pipeline;
    let degrees_of_freedom = pipeline.degrees_of_freedom();

    let chi_square = chi_square_test(distribution)?;
    let one_sample = one_sample_t_test(distribution)?;
    let mean_absolute_variance = distribution.mean_absolute_variance();

    tracing::debug!(
        "{} tests: chi2={:.4} (p={:.4}), t={:.4} (p={:.4}), mav={:.4}%",
        pipeline,
        chi_square.statistic,
        chi_square.p_value,
        one_sample.statistic,
        one_sample.p_value,
        mean_absolute_variance
    );

    Ok(ConformityTests {
        chi_square,
        degrees_of_freedom,
        critical_value: pipeline.critical_chi_square(),
        one_sample,
        mean_absolute_variance,
        fit_quality: FitQuality::from_mean_absolute_variance(mean_absolute_variance),
    })
}

/// Chi-square goodness-of-fit of observed counts against Benford counts.
pub fn chi_square_test(distribution: &DigitDistribution) -> Result<TestResult> {
    let total = distribution.total;
    let statistic: f64 = distribution
        .classes
        .iter()
        .map(|c| {
            let expected = c.expected_count(total);
            let diff = c.count as f64 - expected;
            diff * diff / expected
        })
        .sum();

    let freedom = distribution.classes.len().saturating_sub(1) as f64;
    let reference = ChiSquared::new(freedom).map_err(|e| BenfordError::Statistics {
        context: format!("chi-square with {freedom} degrees of freedom: {e}"),
    })?;

    Ok(TestResult {
        statistic,
        p_value: reference.sf(statistic),
    })
}

/// One-sample t-test of class percentages against the mean Benford percentage.
///
/// A constant sample has no spread: equal means then give `t = 0, p = 1`,
/// different means give an infinite statistic with `p = 0`.
pub fn one_sample_t_test(distribution: &DigitDistribution) -> Result<TestResult> {
    let sample: Vec<f64> = distribution
        .classes
        .iter()
        .map(|c| c.observed_percent())
        .collect();
    let n = sample.len() as f64;
    let hypothesized_mean = distribution
        .classes
        .iter()
        .map(|c| c.expected_percent())
        .sum::<f64>()
        / n;

    let mean = sample.iter().sum::<f64>() / n;
    let sample_variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let standard_error = (sample_variance / n).sqrt();
    let diff = mean - hypothesized_mean;

    if standard_error < SPREAD_NOISE_FLOOR {
        return Ok(if diff.abs() < MEAN_NOISE_FLOOR {
            TestResult {
                statistic: 0.0,
                p_value: 1.0,
            }
        } else {
            TestResult {
                statistic: f64::INFINITY.copysign(diff),
                p_value: 0.0,
            }
        });
    }

    let statistic = diff / standard_error;
    let reference = StudentsT::new(0.0, 1.0, n - 1.0).map_err(|e| BenfordError::Statistics {
        context: format!("Student's t with {} degrees of freedom: {e}", n - 1.0),
    })?;

    Ok(TestResult {
        statistic,
        p_value: (2.0 * reference.sf(statistic.abs())).min(1.0),
    })
}

/// Derives policy verdicts from the test results.
pub fn assess_risk(tests: &ConformityTests, significance_level: f64) -> RiskAssessment {
    RiskAssessment {
        chi_square_significant: tests.chi_square.p_value <= significance_level,
        mean_deviation: tests.one_sample.statistic.abs() > T_STATISTIC_DEVIATION,
        fit_quality: tests.fit_quality,
    }
}
