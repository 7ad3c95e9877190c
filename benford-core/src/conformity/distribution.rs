//! Observed vs. theoretical digit distributions.

use crate::error::{BenfordError, Result};

use super::models::{DigitClassStats, DigitDistribution, DigitPipeline};

/// Benford probability of leading digit class `digit`: `log10(1 + 1/d)`.
///
/// Valid for both pipelines: the first-two-digit classes 10-99 follow the
/// same formula.
pub fn theoretical_fraction(digit: u8) -> f64 {
    (1.0 + 1.0 / f64::from(digit)).log10()
}

/// The full theoretical distribution of a pipeline, as `(digit, fraction)`.
pub fn theoretical_distribution(pipeline: DigitPipeline) -> Vec<(u8, f64)> {
    pipeline
        .classes()
        .map(|d| (d, theoretical_fraction(d)))
        .collect()
}

impl DigitDistribution {
    /// Aggregates extracted digit classes into an observed distribution.
    ///
    /// Classes outside the pipeline range are ignored. Every class of the
    /// range appears in the result, with a zero count when unobserved.
    ///
    /// # Errors
    /// `EmptyAnalysisSet` when no class falls in the pipeline range, since
    /// observed fractions are undefined then.
    pub fn build(pipeline: DigitPipeline, classes: &[u8]) -> Result<Self> {
        let low = pipeline.low();
        let mut counts = vec![0_u64; pipeline.class_count()];
        for &digit in classes.iter().filter(|&&d| pipeline.contains(d)) {
            counts[usize::from(digit - low)] += 1;
        }

        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Err(BenfordError::EmptyAnalysisSet { pipeline });
        }

        let classes = pipeline
            .classes()
            .zip(counts)
            .map(|(digit, count)| {
                let observed = count as f64 / total as f64;
                let expected = theoretical_fraction(digit);
                DigitClassStats {
                    digit,
                    count,
                    observed,
                    expected,
                    variance: (observed - expected) * 100.0,
                }
            })
            .collect();

        Ok(Self {
            pipeline,
            total,
            classes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theoretical_first_digit_values() {
        assert!((theoretical_fraction(1) - 0.301_029_995_663_981_2).abs() < 1e-12);
        assert!((theoretical_fraction(9) - 0.045_757_490_560_675_1).abs() < 1e-12);
    }

    #[test]
    fn test_theoretical_distributions_sum_to_one() {
        for pipeline in DigitPipeline::ALL {
            let sum: f64 = theoretical_distribution(pipeline)
                .iter()
                .map(|(_, p)| p)
                .sum();
            assert!((sum - 1.0).abs() < 1e-9, "{pipeline} sums to {sum}");
        }
    }

    #[test]
    fn test_build_fills_missing_classes() {
        let distribution = DigitDistribution::build(DigitPipeline::FirstDigit, &[1, 1, 3]).unwrap();

        assert_eq!(distribution.total, 3);
        assert_eq!(distribution.classes.len(), 9);

        let one = distribution.class(1).unwrap();
        assert_eq!(one.count, 2);
        assert!((one.observed - 2.0 / 3.0).abs() < 1e-12);

        let two = distribution.class(2).unwrap();
        assert_eq!(two.count, 0);
        assert_eq!(two.observed, 0.0);
        assert!((two.variance + theoretical_fraction(2) * 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_build_ignores_out_of_range_classes() {
        let distribution =
            DigitDistribution::build(DigitPipeline::FirstTwoDigits, &[0, 5, 12, 12, 100]).unwrap();

        assert_eq!(distribution.total, 2);
        assert_eq!(distribution.classes.len(), 90);
        assert_eq!(distribution.class(12).unwrap().count, 2);
        assert!(distribution.class(5).is_none());
    }

    #[test]
    fn test_build_empty_is_degenerate() {
        let result = DigitDistribution::build(DigitPipeline::FirstDigit, &[]);
        assert!(matches!(
            result,
            Err(BenfordError::EmptyAnalysisSet {
                pipeline: DigitPipeline::FirstDigit
            })
        ));

        let result = DigitDistribution::build(DigitPipeline::FirstTwoDigits, &[1, 2, 3]);
        assert!(matches!(result, Err(BenfordError::EmptyAnalysisSet { .. })));
    }

    #[test]
    fn test_uniform_first_digits_variance() {
        let classes: Vec<u8> = (1..=9).collect();
        let distribution = DigitDistribution::build(DigitPipeline::FirstDigit, &classes).unwrap();

        for stats in &distribution.classes {
            assert!((stats.observed - 1.0 / 9.0).abs() < 1e-12);
        }
        let one = distribution.class(1).unwrap();
        assert!((one.variance - (100.0 / 9.0 - 30.103)).abs() < 1e-3);
    }
}
