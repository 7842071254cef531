//! Error types for the statmelt pipelines.
//!
//! This module defines a hierarchy of error types following best practices:
//!
//! - [`CsvError`] - CSV reading, decoding and writing errors
//! - [`ReshapeError`] - e-Stat reshape pipeline errors
//! - [`CohortError`] - cohort derivation pipeline errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV I/O Errors
// =============================================================================

/// Errors while reading or writing CSV files.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode file content.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,
}

// =============================================================================
// Reshape Errors
// =============================================================================

/// Errors from the e-Stat wide-to-long reshape pipeline.
#[derive(Debug, Error)]
pub enum ReshapeError {
    /// Input file does not exist.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// The grid is too short to contain the fixed preamble, header and data.
    #[error("Layout mismatch: expected at least {required} rows (10 metadata, 1 header, 1 data), found {found}")]
    TooFewRows { found: usize, required: usize },

    /// The header row ends before the first region series column.
    #[error("Layout mismatch: header row has {found} columns, need at least {required} (12 attributes, 1 spacer, 1 region)")]
    NoRegionColumns { found: usize, required: usize },

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Cohort Errors
// =============================================================================

/// Errors from the cohort derivation pipeline.
#[derive(Debug, Error)]
pub enum CohortError {
    /// Input file does not exist.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid JSON input.
    #[error("Invalid JSON input: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The input array holds no records.
    #[error("No records in cohort export")]
    EmptyInput,

    /// All records were invalid.
    #[error("All {0} records failed validation")]
    AllInvalid(usize),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for reshape operations.
pub type ReshapeResult<T> = Result<T, ReshapeError>;

/// Result type for cohort operations.
pub type CohortResult<T> = Result<T, CohortError>;
