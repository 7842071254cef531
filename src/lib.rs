//! # Statmelt - residency statistics reshaping and cohort derivation
//!
//! Statmelt turns fixed-layout e-Stat CSV extracts of residency
//! examination statistics into tidy long-format CSV, and derives cohort
//! progress tables from JSON exports of monthly progress reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ e-Stat CSV  │────▶│    Table    │────▶│   Reshape   │────▶│  Tidy CSV   │
//! │ (SJIS/UTF8) │     │ (auto-enc)  │     │ (melt+clean)│     │ (UTF-8 BOM) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use statmelt::reshape::{self, reshape_csv};
//! use std::path::Path;
//!
//! fn main() {
//!     let summary = reshape_csv(
//!         Path::new(reshape::DEFAULT_INPUT),
//!         Path::new(reshape::DEFAULT_OUTPUT),
//!     )
//!     .unwrap();
//!     println!("Wrote {} records", summary.records);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Console log formatting
//! - [`models`] - Domain models (LongRecord, CohortRow)
//! - [`table`] - CSV grid I/O with encoding auto-detection
//! - [`reshape`] - e-Stat wide-to-long reshape
//! - [`cohort`] - Cohort progress derivation
//! - [`validation`] - Cohort record schema validation

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// CSV grid I/O
pub mod table;

// Pipelines
pub mod cohort;
pub mod reshape;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CohortError,
    CohortResult,
    CsvError,
    CsvResult,
    ReshapeError,
    ReshapeResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CohortRow, LongRecord};

// =============================================================================
// Re-exports - Table I/O
// =============================================================================

pub use table::{
    decode_content,
    detect_encoding,
    parse_grid,
    read_table,
    write_csv_with_bom,
    RawTable,
    UTF8_BOM,
};

// =============================================================================
// Re-exports - Reshape
// =============================================================================

pub use reshape::{
    bureau_prefix,
    clean_count,
    clean_count_classified,
    reshape_csv,
    reshape_table,
    CellKind,
    CleanStats,
    EstatLayout,
    MeltedCell,
    ReshapeSummary,
    ReshapedTable,
    WideTable,
};

// =============================================================================
// Re-exports - Cohort
// =============================================================================

pub use cohort::{
    activity_rate,
    coerce_count,
    derive_cohort,
    derive_row,
    normalize_month,
    CohortSummary,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    is_valid,
    is_valid_cohort_record,
    validate,
    validate_cohort_record,
};
