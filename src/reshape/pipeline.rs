//! High-level e-Stat reshape pipeline.
//!
//! Combines the steps into one call: read the grid with encoding
//! detection, check the layout, melt, clean, derive the bureau column
//! and write the tidy table as UTF-8 CSV with a BOM.
//!
//! # Example
//!
//! ```rust,ignore
//! use statmelt::reshape::{reshape_csv, DEFAULT_INPUT, DEFAULT_OUTPUT};
//! use std::path::Path;
//!
//! let summary = reshape_csv(Path::new(DEFAULT_INPUT), Path::new(DEFAULT_OUTPUT))?;
//! println!("{} records", summary.records);
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{ReshapeError, ReshapeResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::LongRecord;
use crate::reshape::clean::{bureau_prefix, clean_count_classified, CleanStats};
use crate::reshape::layout::EstatLayout;
use crate::reshape::melt::WideTable;
use crate::table::{read_table, write_csv_with_bom, RawTable};

/// Input the portal download lands in when fetched by the data scripts.
pub const DEFAULT_INPUT: &str = "data/raw/estat_raw.csv";

/// Output consumed by the analytics dashboards.
pub const DEFAULT_OUTPUT: &str = "data/processed/estat_transformed.csv";

/// Records and diagnostics produced from one grid.
#[derive(Debug, Clone)]
pub struct ReshapedTable {
    /// Tidy records, region-major.
    pub records: Vec<LongRecord>,
    /// Cell interpretation counts for the value columns.
    pub cells: CleanStats,
    /// Data rows in the source grid.
    pub data_rows: usize,
    /// Region series in the source grid.
    pub regions: usize,
    /// Short data rows padded to the header width.
    pub padded_rows: usize,
}

/// Result of a complete reshape run.
#[derive(Debug, Clone, Serialize)]
pub struct ReshapeSummary {
    /// Encoding the input was decoded from.
    pub encoding: String,
    /// Data rows in the source grid.
    pub data_rows: usize,
    /// Region series in the source grid.
    pub regions: usize,
    /// Records written (`data_rows * regions`).
    pub records: usize,
    /// Short data rows padded to the header width.
    pub padded_rows: usize,
    /// Cell interpretation counts for the value columns.
    pub cells: CleanStats,
    /// Where the tidy table was written.
    pub output_path: PathBuf,
}

/// Melt one grid into tidy records.
///
/// Pure transformation half of the pipeline: validates the layout,
/// melts region-major, cleans every count and derives the bureau
/// column. The projection picks the examination, month and disposition
/// attributes by their layout positions.
pub fn reshape_table(table: &RawTable, layout: &EstatLayout) -> ReshapeResult<ReshapedTable> {
    let wide = WideTable::from_table(table, layout)?;

    let mut cells = CleanStats::default();
    let records: Vec<LongRecord> = wide
        .melt()
        .map(|cell| {
            let (count, kind) = clean_count_classified(Some(cell.value));
            cells.record(kind);
            LongRecord {
                examination: cell.attrs[layout.examination_col].clone(),
                region: cell.region.to_string(),
                bureau: bureau_prefix(cell.region).to_string(),
                month: cell.attrs[layout.month_col].clone(),
                disposition: cell.attrs[layout.disposition_col].clone(),
                count,
            }
        })
        .collect();

    Ok(ReshapedTable {
        data_rows: wide.data_rows(),
        regions: wide.regions(),
        padded_rows: wide.padded_rows,
        records,
        cells,
    })
}

/// Reshape an e-Stat extract file into a tidy CSV file.
///
/// This is the main entry point for the reshape. It:
/// 1. Checks the input exists
/// 2. Reads the grid with encoding auto-detection
/// 3. Validates the fixed layout
/// 4. Melts, cleans and derives the bureau column
/// 5. Writes the result as UTF-8 with a BOM, creating directories
pub fn reshape_csv(input: &Path, output: &Path) -> ReshapeResult<ReshapeSummary> {
    if !input.exists() {
        return Err(ReshapeError::InputNotFound(input.to_path_buf()));
    }

    log_info(format!("📖 Reading {}", input.display()));
    let table = read_table(input)?;
    log_success(format!("Detected encoding: {}", table.encoding));
    log_success(format!("Read {} rows", table.rows.len()));

    let layout = EstatLayout::default();
    let reshaped = reshape_table(&table, &layout)?;

    if reshaped.padded_rows > 0 {
        log_warning(format!(
            "{} short data rows padded with empty cells",
            reshaped.padded_rows
        ));
    }
    log_success(format!(
        "Melted {} data rows × {} regions into {} records",
        reshaped.data_rows,
        reshaped.regions,
        reshaped.records.len()
    ));
    log_info_indent(
        format!(
            "Cells: {} numeric, {} placeholder, {} coerced",
            reshaped.cells.numeric, reshaped.cells.placeholder, reshaped.cells.coerced
        ),
        1,
    );
    if reshaped.cells.coerced > 0 {
        log_warning(format!(
            "{} unparseable cells coerced to 0",
            reshaped.cells.coerced
        ));
    }

    write_csv_with_bom(output, &reshaped.records)?;
    log_success(format!("変換完了: {}", output.display()));

    Ok(ReshapeSummary {
        encoding: table.encoding,
        data_rows: reshaped.data_rows,
        regions: reshaped.regions,
        records: reshaped.records.len(),
        padded_rows: reshaped.padded_rows,
        cells: reshaped.cells,
        output_path: output.to_path_buf(),
    })
}
