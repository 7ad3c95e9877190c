//! Plain-text rendering of conformity reports.

use benford_core::conformity::{
    AnomalyFindings, DigitPipeline, FitQuality, PipelineOutcome, PipelineReport,
    SuspiciousRecord,
    config::{ANOMALOUS_FIT_MIN_MAV, GOOD_FIT_MAX_MAV, T_STATISTIC_DEVIATION},
};
use benford_core::{ConformityReport, RecordSet};

/// Presentation options for the text report.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Lower bound of the suspicious-value filter
    pub range_min: Option<f64>,
    /// Upper bound of the suspicious-value filter
    pub range_max: Option<f64>,
    /// Maximum number of suspicious records listed per pipeline
    pub max_records: usize,
    /// Significance level the chi-square verdict was computed with
    pub significance_level: f64,
}

/// Renders a full text report.
///
/// `records` is used to print the source record behind each flagged value.
pub fn render_text(
    report: &ConformityReport,
    records: Option<&RecordSet>,
    options: &RenderOptions,
) -> String {
    let mut lines = vec![
        format!("Benford's Law analysis of column '{}'", report.column_name),
        String::new(),
    ];

    render_validation(&mut lines, report);

    for pipeline in DigitPipeline::ALL {
        lines.push(String::new());
        match report.pipeline(pipeline) {
            PipelineOutcome::Analyzed(pipeline_report) => {
                render_pipeline(&mut lines, pipeline_report, records, options);
            }
            PipelineOutcome::EmptyAnalysisSet { .. } => {
                lines.push(format!("{} analysis", heading(pipeline)));
                lines.push(format!(
                    "  [WARN] No values available for {pipeline} analysis"
                ));
            }
            PipelineOutcome::Skipped { .. } => {
                lines.push(format!("{} analysis", heading(pipeline)));
                lines.push("  [SKIP] Disabled by configuration".to_string());
            }
        }
    }

    lines.join("\n")
}

fn heading(pipeline: DigitPipeline) -> &'static str {
    match pipeline {
        DigitPipeline::FirstDigit => "First digit",
        DigitPipeline::FirstTwoDigits => "First two digit",
    }
}

fn render_validation(lines: &mut Vec<String>, report: &ConformityReport) {
    let s = &report.sanitization;
    lines.push("Data validation".to_string());
    lines.push(format!("  Total rows in selected column: {}", s.total));
    lines.push(format!("  Missing values:                {}", s.missing));
    lines.push(format!("  Zero values:                   {}", s.zero));
    lines.push(format!("  Valid rows used for analysis:  {}", s.valid));

    let e = &report.extraction;
    if e.out_of_domain > 0 {
        lines.push(format!(
            "  Values below 1 (no leading digit): {}",
            e.out_of_domain
        ));
    }
    if e.malformed > 0 {
        lines.push(format!("  Non-finite values skipped:     {}", e.malformed));
    }
    if !s.missing_indices.is_empty() {
        let indices: Vec<String> = s.missing_indices.iter().map(ToString::to_string).collect();
        lines.push(format!("  Rows with missing values:      {}", indices.join(", ")));
    }
}

fn render_pipeline(
    lines: &mut Vec<String>,
    report: &PipelineReport,
    records: Option<&RecordSet>,
    options: &RenderOptions,
) {
    let distribution = &report.distribution;
    let pipeline = distribution.pipeline;
    let tests = &report.tests;

    lines.push(format!(
        "{} analysis ({} values)",
        heading(pipeline),
        distribution.total
    ));
    lines.push(format!(
        "  {:>5}  {:>8}  {:>9}  {:>10}",
        "Digit", "Actual %", "Benford %", "Variance %"
    ));
    for c in &distribution.classes {
        lines.push(format!(
            "  {:>5}  {:>8.2}  {:>9.2}  {:>10.2}",
            c.digit,
            c.observed_percent(),
            c.expected_percent(),
            c.variance
        ));
    }

    lines.push(String::new());
    lines.push("  Statistical tests".to_string());
    lines.push(format!(
        "  Chi-squared statistic: {:.2} (critical value df={}, alpha=0.05: {:.2})",
        tests.chi_square.statistic, tests.degrees_of_freedom, tests.critical_value
    ));
    lines.push(format!(
        "  p-value: {:.4} (<= {} means significant deviation)",
        tests.chi_square.p_value, options.significance_level
    ));
    lines.push(format!(
        "  T-test statistic: {:.2} (|t| > {T_STATISTIC_DEVIATION} means deviation in mean %)",
        tests.one_sample.statistic
    ));
    lines.push(format!(
        "  T-test p-value: {:.4} (informal: compares class percentages, not raw values)",
        tests.one_sample.p_value
    ));
    lines.push(format!(
        "  Mean absolute variance: {:.2}% (< {GOOD_FIT_MAX_MAV}% good fit, > {ANOMALOUS_FIT_MIN_MAV}% anomaly)",
        tests.mean_absolute_variance
    ));

    lines.push(String::new());
    lines.push("  Risk assessment".to_string());
    let risk = &report.risk;
    lines.push(if risk.chi_square_significant {
        "  [WARN] Chi-squared test indicates significant deviation from Benford's Law".to_string()
    } else {
        "  [OK] Chi-squared test suggests data conforms to Benford's Law".to_string()
    });
    lines.push(if risk.mean_deviation {
        "  [WARN] T-test shows deviation in average percentage distribution".to_string()
    } else {
        "  [OK] T-test shows no significant deviation in average percentage".to_string()
    });
    match risk.fit_quality {
        FitQuality::Anomalous => lines.push(format!(
            "  [WARN] Average deviation exceeds {ANOMALOUS_FIT_MIN_MAV}%, possible localized anomalies"
        )),
        FitQuality::Good => lines.push(format!(
            "  [OK] Average deviation below {GOOD_FIT_MAX_MAV}%, data fits Benford's Law well"
        )),
        FitQuality::Acceptable => {}
    }

    lines.push(String::new());
    render_recommendation(lines, pipeline);

    lines.push(String::new());
    render_anomalies(lines, &report.anomalies, records, options);
}

fn render_recommendation(lines: &mut Vec<String>, pipeline: DigitPipeline) {
    let digits = match pipeline {
        DigitPipeline::FirstDigit => "first digits",
        DigitPipeline::FirstTwoDigits => "first two digits",
    };
    lines.push("  Audit recommendation".to_string());
    lines.push(format!(
        "  - Review transactions with {digits} showing high variance"
    ));
    lines.push(
        "  - Consider segmenting data by time, department, or transaction type".to_string(),
    );
    lines.push(
        "  - Validate suspicious entries with source documents or system logs".to_string(),
    );
}

fn render_anomalies(
    lines: &mut Vec<String>,
    anomalies: &AnomalyFindings,
    records: Option<&RecordSet>,
    options: &RenderOptions,
) {
    let Some(range) = anomalies.value_range else {
        lines.push(format!(
            "  [OK] No digit class deviates by more than +/-{}%; no suspicious records",
            anomalies.threshold
        ));
        return;
    };

    let classes: Vec<String> = anomalies
        .suspicious_classes
        .iter()
        .map(|c| format!("[{}]: {:.2}%", c.digit, c.variance))
        .collect();
    lines.push(format!(
        "  [WARN] Suspicious digits (variance > +/-{}%): {}",
        anomalies.threshold,
        classes.join(", ")
    ));
    lines.push(format!(
        "  Total suspicious rows: {} ({:.2}%)",
        anomalies.flagged_count, anomalies.flagged_percent
    ));

    let shown: Vec<SuspiciousRecord> = if range.is_single_value() {
        lines.push(format!(
            "  Suspicious value range is a single value: {:.2}",
            range.min
        ));
        anomalies.records.clone()
    } else {
        let min = options.range_min.unwrap_or(range.min);
        let max = options.range_max.unwrap_or(range.max);
        lines.push(format!(
            "  Suspicious value range: {:.2} to {:.2}",
            range.min, range.max
        ));
        if options.range_min.is_some() || options.range_max.is_some() {
            lines.push(format!("  Filtered to: {min:.2} to {max:.2}"));
        }
        anomalies.records_in_range(min, max)
    };

    lines.push(format!("  {:>7}  {:>14}  {:>5}  Record", "Row", "Value", "Class"));
    for record in shown.iter().take(options.max_records) {
        let source = records
            .and_then(|r| r.row(record.index))
            .map(ToString::to_string)
            .unwrap_or_default();
        lines.push(format!(
            "  {:>7}  {:>14.2}  {:>5}  {}",
            record.index, record.value, record.digit, source
        ));
    }
    if shown.len() > options.max_records {
        lines.push(format!(
            "  ... {} more suspicious row(s) not shown",
            shown.len() - options.max_records
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use benford_core::{BenfordAnalyzer, RawColumn};

    fn options() -> RenderOptions {
        RenderOptions {
            max_records: 50,
            significance_level: 0.05,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_render_uniform_column() {
        let values: Vec<f64> = (1..=9).map(|d| f64::from(d) * 100.0).collect();
        let report = BenfordAnalyzer::with_defaults()
            .analyze(&RawColumn::from_values("amount", values))
            .unwrap();

        let text = render_text(&report, None, &options());

        assert!(text.contains("column 'amount'"));
        assert!(text.contains("Valid rows used for analysis:  9"));
        assert!(text.contains("[WARN] Chi-squared test indicates significant deviation"));
        assert!(text.contains("Suspicious digits"));
        // 1 and 2 are under-represented, 7 to 9 over-represented
        assert!(text.contains("[1]:"));
        assert!(text.contains("[7]:"));
        assert!(!text.contains("[5]:"));
        assert!(text.contains("Total suspicious rows: 5 (55.56%)"));
    }

    #[test]
    fn test_render_audit_recommendation_per_pipeline() {
        let values: Vec<f64> = (1..=9).map(|d| f64::from(d) * 100.0).collect();
        let report = BenfordAnalyzer::with_defaults()
            .analyze(&RawColumn::from_values("amount", values))
            .unwrap();

        let text = render_text(&report, None, &options());

        assert_eq!(text.matches("Audit recommendation").count(), 2);
        assert!(text.contains("Review transactions with first digits showing high variance"));
        assert!(text.contains("Review transactions with first two digits showing high variance"));
        assert!(text.contains("Validate suspicious entries with source documents"));
    }

    #[test]
    fn test_render_empty_and_skipped_pipelines() {
        let report = BenfordAnalyzer::new(
            benford_core::ConformityConfig::new().with_first_two_digits(false),
        )
        .unwrap()
        .analyze(&RawColumn::new("amount", vec![None, Some(0.5)]))
        .unwrap();

        let text = render_text(&report, None, &options());

        assert!(text.contains("Missing values:                1"));
        assert!(text.contains("Values below 1 (no leading digit): 1"));
        assert!(text.contains("Rows with missing values:      0"));
        assert!(text.contains("No values available for first-digit analysis"));
        assert!(text.contains("[SKIP] Disabled by configuration"));
    }

    #[test]
    fn test_render_single_value_range() {
        // Benford shares over 1,000 values, every digit-5 value equal to 500
        let mut values = Vec::new();
        for digit in 1..=9_u8 {
            let share = benford_core::conformity::theoretical_fraction(digit);
            let count = (share * 1000.0).round() as usize;
            values.extend(std::iter::repeat_n(f64::from(digit) * 100.0, count));
        }
        values.extend(std::iter::repeat_n(500.0, 100));
        let report = BenfordAnalyzer::new(
            benford_core::ConformityConfig::new().with_first_two_digits(false),
        )
        .unwrap()
        .analyze(&RawColumn::from_values("amount", values))
        .unwrap();

        let text = render_text(&report, None, &options());

        assert!(text.contains("Suspicious digits (variance > +/-5%): [5]:"));
        assert!(text.contains("single value: 500.00"));
    }

    #[test]
    fn test_render_truncates_record_listing() {
        let mut values: Vec<f64> = (1..=9).map(|d| f64::from(d) * 100.0).collect();
        values.extend((0..20).map(|i| 500.0 + f64::from(i)));
        let report = BenfordAnalyzer::with_defaults()
            .analyze(&RawColumn::from_values("amount", values))
            .unwrap();

        let text = render_text(
            &report,
            None,
            &RenderOptions {
                max_records: 5,
                ..options()
            },
        );

        assert!(text.contains("more suspicious row(s) not shown"));
    }
}
