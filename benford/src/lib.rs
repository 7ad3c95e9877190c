//! Library module for the `benford` audit tool.
//!
//! Holds the command-line definition and command execution so both can be
//! exercised from integration tests. The binary in `main.rs` only parses
//! arguments, initializes logging and prints the result.

pub mod output;
pub mod report;

use std::path::PathBuf;

use benford_core::{BenfordAnalyzer, BenfordError, ConformityConfig, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::report::RenderOptions;

/// CLI argument structure
#[derive(Parser, Debug)]
#[command(name = "benford")]
#[command(about = "Benford's Law conformity audit for numeric columns")]
#[command(version)]
#[command(long_about = "
Benford - leading-digit conformity audit

Reads a JSON array of record objects, selects one numeric column and compares
its first-digit and first-two-digit distributions against Benford's Law.

REPORT CONTENTS:
- Data validation summary (missing, zero and valid rows)
- Observed vs. expected digit percentages
- Chi-squared and t-test results with critical values
- Suspicious digit classes and the records behind them

A flagged record is a lead for review, not evidence of fraud.

EXAMPLES:
  benford columns ledger.json
  benford analyze ledger.json --column amount
  benford analyze ledger.json --format json --output report.json
  benford analyze ledger.json --threshold 3 --range-min 500 --range-max 900
")]
pub struct Cli {
    /// Flags shared by all commands
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one column for conformity with Benford's Law
    Analyze(AnalyzeArgs),
    /// List the numeric columns of an input file
    Columns(ColumnsArgs),
}

/// Report rendering format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text report
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

/// Arguments of `benford analyze`
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input file
    #[arg(help = "JSON file containing an array of record objects")]
    pub input: PathBuf,

    /// Column to analyze
    #[arg(short, long, help = "Column to analyze (defaults to the first numeric column)")]
    pub column: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON report file
    #[arg(short, long, help = "Also write the JSON report to this file")]
    pub output: Option<PathBuf>,

    /// Suspicious variance threshold in percentage points
    #[arg(
        long,
        default_value_t = benford_core::conformity::config::SUSPICIOUS_VARIANCE_THRESHOLD,
        help = "Flag digit classes whose variance exceeds +/- this many percentage points"
    )]
    pub threshold: f64,

    /// Chi-square significance level
    #[arg(
        long,
        default_value_t = benford_core::conformity::config::SIGNIFICANCE_LEVEL,
        help = "Significance level for the chi-squared verdict"
    )]
    pub significance: f64,

    /// Skip the first-two-digit analysis
    #[arg(long, help = "Only run the first-digit analysis")]
    pub skip_first_two: bool,

    /// Lower bound of the suspicious-value filter
    #[arg(long, help = "Only list suspicious records with value >= this bound")]
    pub range_min: Option<f64>,

    /// Upper bound of the suspicious-value filter
    #[arg(long, help = "Only list suspicious records with value <= this bound")]
    pub range_max: Option<f64>,

    /// Maximum suspicious records listed per analysis
    #[arg(long, default_value_t = 50)]
    pub max_records: usize,
}

/// Arguments of `benford columns`
#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// Input file
    #[arg(help = "JSON file containing an array of record objects")]
    pub input: PathBuf,
}

/// Verbosity flags accepted before or after the command
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

/// Builds the conformity configuration from analyze arguments.
pub fn build_config(args: &AnalyzeArgs) -> ConformityConfig {
    ConformityConfig::new()
        .with_suspicious_variance_threshold(args.threshold)
        .with_significance_level(args.significance)
        .with_first_two_digits(!args.skip_first_two)
}

/// Executes the parsed command and returns the text to print.
///
/// # Errors
/// I/O and parse failures of the input file, column selection errors,
/// invalid thresholds, and failures writing `--output`.
pub async fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Analyze(args) => analyze(args).await,
        Command::Columns(args) => list_columns(args).await,
    }
}

async fn analyze(args: &AnalyzeArgs) -> Result<String> {
    let records = output::load_records(&args.input).await?;
    let analyzer = BenfordAnalyzer::new(build_config(args))?;
    let report = analyzer.analyze_records(&records, args.column.as_deref())?;
    info!("Analyzed column '{}'", report.column_name);

    if let Some(output_path) = &args.output {
        output::save_report(&report, output_path).await?;
    }

    match args.format {
        OutputFormat::Json => output::report_json(&report),
        OutputFormat::Text => {
            let options = RenderOptions {
                range_min: args.range_min,
                range_max: args.range_max,
                max_records: args.max_records,
                significance_level: analyzer.config().significance_level,
            };
            Ok(report::render_text(&report, Some(&records), &options))
        }
    }
}

async fn list_columns(args: &ColumnsArgs) -> Result<String> {
    let records = output::load_records(&args.input).await?;
    let columns = records.numeric_columns();
    if columns.is_empty() {
        return Err(BenfordError::NoNumericColumns);
    }
    Ok(columns.join("\n"))
}
