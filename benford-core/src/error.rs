//! Error types for the conformity engine and its I/O shell.
//!
//! Per-record problems (values that cannot be reduced to a finite magnitude)
//! are never errors: they are counted and skipped. Only conditions that make a
//! whole analysis (or one of its pipelines) meaningless are surfaced here.

use thiserror::Error;

use crate::conformity::DigitPipeline;

/// Main error type for Benford analysis operations.
#[derive(Debug, Error)]
pub enum BenfordError {
    /// The ingested record set has no numeric column to analyze
    #[error("No numeric columns found")]
    NoNumericColumns,

    /// The requested column does not exist in the record set
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// The requested column exists but holds non-numeric values
    #[error("Column '{column}' is not numeric")]
    NotNumeric { column: String },

    /// A pipeline has zero extractable digit classes
    #[error("No values available for {pipeline} analysis")]
    EmptyAnalysisSet { pipeline: DigitPipeline },

    /// A reference distribution could not be constructed
    #[error("Statistical test failed: {context}")]
    Statistics { context: String },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with BenfordError
pub type Result<T> = std::result::Result<T, BenfordError>;

impl BenfordError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a column-not-found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Returns true if this error only invalidates a single pipeline.
    ///
    /// The analyzer uses this to keep reporting the other pipeline instead of
    /// failing the whole run.
    pub fn is_empty_analysis_set(&self) -> bool {
        matches!(self, Self::EmptyAnalysisSet { .. })
    }
}
