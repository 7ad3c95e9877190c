//! Core conformity engine for Benford's Law audits.
//!
//! This crate evaluates whether a numeric column follows the logarithmic
//! leading-digit distribution described by Benford's Law, and flags digit
//! classes (and the records behind them) that deviate beyond a tolerance.
//!
//! # Guarantees
//! - Pure, synchronous, in-memory computation with no I/O
//! - No state shared between runs: every analysis is re-entrant
//! - Degenerate input is reported as a result state, never as NaN statistics
//!
//! # Scope
//! The engine reports statistical deviation and candidate records only. A
//! flagged record is a lead for review, not evidence of fraud.

pub mod conformity;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use conformity::{
    BenfordAnalyzer, ConformityConfig, ConformityReport, DigitPipeline, PipelineOutcome,
};
pub use error::{BenfordError, Result};
pub use logging::init_logging;
pub use models::{RawColumn, RecordSet};
