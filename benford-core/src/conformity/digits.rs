//! Leading-digit extraction.
//!
//! A value's digit classes come from its truncated integer magnitude rendered
//! in decimal: `123.9` and `-123.1` both read as `123`, giving first digit 1
//! and first-two-digit class 12. Extraction is scale sensitive on purpose:
//! `0.5` has no leading digit while `5.0` does.

use super::models::{DigitExtraction, ExtractedValue, ExtractionSummary, SanitizedColumn};

/// Extracts the first-digit and first-two-digit classes of one value.
///
/// Returns `OutOfDomain` when `|value| < 1` (the magnitude truncates to zero)
/// and `Malformed` when the magnitude is not finite. Single-digit magnitudes
/// carry no first-two-digit class.
pub fn extract(value: f64) -> DigitExtraction {
    let magnitude = value.abs().trunc();
    if !magnitude.is_finite() {
        return DigitExtraction::Malformed;
    }
    if magnitude < 1.0 {
        return DigitExtraction::OutOfDomain;
    }

    // `{:.0}` renders the exact integer value, without exponent notation.
    let rendered = format!("{magnitude:.0}");
    let mut digits = rendered.bytes().map(|b| b.wrapping_sub(b'0'));

    let first = match digits.next() {
        Some(d @ 1..=9) => d,
        _ => return DigitExtraction::Malformed,
    };
    let first_two = match digits.next() {
        Some(d @ 0..=9) => Some(first * 10 + d),
        _ => None,
    };

    DigitExtraction::Digits { first, first_two }
}

/// Extracts digit classes for every value of a sanitized column.
///
/// Values that cannot be extracted stay in the returned list (so record
/// mapping keeps its indices) but are only counted in the summary.
pub fn extract_all(column: &SanitizedColumn) -> (Vec<ExtractedValue>, ExtractionSummary) {
    let mut summary = ExtractionSummary::default();
    let extracted: Vec<ExtractedValue> = column
        .values
        .iter()
        .map(|v| {
            let digits = extract(v.value);
            match digits {
                DigitExtraction::Digits { first_two, .. } => {
                    summary.first_digit += 1;
                    if first_two.is_some() {
                        summary.first_two_digits += 1;
                    }
                }
                DigitExtraction::OutOfDomain => summary.out_of_domain += 1,
                DigitExtraction::Malformed => summary.malformed += 1,
            }
            ExtractedValue {
                index: v.index,
                value: v.value,
                digits,
            }
        })
        .collect();

    if summary.out_of_domain > 0 {
        tracing::warn!(
            "{} value(s) with magnitude below 1 have no leading digit and were excluded",
            summary.out_of_domain
        );
    }
    if summary.malformed > 0 {
        tracing::warn!(
            "{} value(s) with non-finite magnitude were excluded",
            summary.malformed
        );
    }

    (extracted, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformity::sanitize::sanitize;
    use crate::models::RawColumn;

    fn digits(first: u8, first_two: Option<u8>) -> DigitExtraction {
        DigitExtraction::Digits { first, first_two }
    }

    #[test]
    fn test_extract_truncates_magnitude() {
        assert_eq!(extract(123.9), digits(1, Some(12)));
        assert_eq!(extract(-987.0), digits(9, Some(98)));
        assert_eq!(extract(45.0), digits(4, Some(45)));
        assert_eq!(extract(10.0), digits(1, Some(10)));
    }

    #[test]
    fn test_extract_single_digit_has_no_first_two() {
        assert_eq!(extract(7.0), digits(7, None));
        assert_eq!(extract(9.99), digits(9, None));
        assert_eq!(extract(-1.5), digits(1, None));
    }

    #[test]
    fn test_extract_below_one_is_out_of_domain() {
        assert_eq!(extract(0.5), DigitExtraction::OutOfDomain);
        assert_eq!(extract(-0.999), DigitExtraction::OutOfDomain);
        assert_eq!(extract(1e-12), DigitExtraction::OutOfDomain);
    }

    #[test]
    fn test_extract_non_finite_is_malformed() {
        assert_eq!(extract(f64::INFINITY), DigitExtraction::Malformed);
        assert_eq!(extract(f64::NEG_INFINITY), DigitExtraction::Malformed);
        assert_eq!(extract(f64::NAN), DigitExtraction::Malformed);
    }

    #[test]
    fn test_extract_large_magnitudes() {
        assert_eq!(extract(1e300), digits(1, Some(10)));
        assert_eq!(extract(f64::MAX), digits(1, Some(17)));
        assert_eq!(extract(4.2e20), digits(4, Some(42)));
    }

    #[test]
    fn test_extract_is_scale_sensitive() {
        // Scaling across the unit boundary changes the outcome entirely.
        assert_eq!(extract(0.5), DigitExtraction::OutOfDomain);
        assert_eq!(extract(0.5 * 10.0), digits(5, None));

        // Binary rounding of the scaled value shifts the truncated digits.
        assert_eq!(extract(2.9 * 10.0), digits(2, Some(29)));
        assert_eq!(extract(0.29 * 100.0), digits(2, Some(28)));
    }

    #[test]
    fn test_extract_all_summary() {
        let column = RawColumn::new(
            "amount",
            vec![
                Some(150.0),
                Some(3.0),
                Some(0.25),
                None,
                Some(f64::INFINITY),
                Some(42.0),
            ],
        );
        let sanitized = sanitize(&column);

        let (extracted, summary) = extract_all(&sanitized);

        assert_eq!(extracted.len(), 5);
        assert_eq!(summary.first_digit, 3);
        assert_eq!(summary.first_two_digits, 2);
        assert_eq!(summary.out_of_domain, 1);
        assert_eq!(summary.malformed, 1);

        let indices: Vec<usize> = extracted.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 4, 5]);
    }
}
