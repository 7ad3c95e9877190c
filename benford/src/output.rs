//! File input and output for the CLI.
//!
//! Reads JSON record sets and writes conformity reports as pretty JSON.

use std::path::Path;

use benford_core::error::BenfordError;
use benford_core::{ConformityReport, RecordSet, Result};

/// Loads a JSON array of record objects from disk.
pub async fn load_records(input_path: &Path) -> Result<RecordSet> {
    let json = tokio::fs::read_to_string(input_path)
        .await
        .map_err(|e| BenfordError::io(format!("Failed to read {}", input_path.display()), e))?;

    let records = RecordSet::from_json_str(&json)?;
    tracing::info!(
        "Loaded {} records from {}",
        records.len(),
        input_path.display()
    );
    Ok(records)
}

/// Serializes a report as pretty-printed JSON.
pub fn report_json(report: &ConformityReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| BenfordError::serialization("JSON serialization", e))
}

/// Saves a report to file as JSON.
pub async fn save_report(report: &ConformityReport, output_path: &Path) -> Result<()> {
    let json_data = report_json(report)?;

    tokio::fs::write(output_path, json_data)
        .await
        .map_err(|e| BenfordError::io(format!("Failed to write to {}", output_path.display()), e))?;

    tracing::info!("Report saved to {}", output_path.display());
    Ok(())
}
