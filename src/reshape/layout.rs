//! Fixed grid layout of an e-Stat wide-format extract.
//!
//! The portal exports the same frame for every table in this series:
//!
//! ```text
//! rows  0..=9   table metadata (title, survey notes, units)
//! row   10      header: 12 attribute labels, a spacer, region names
//! rows  11..    data, aligned under the header
//! cols  0..=11  attribute columns
//! col   12      spacer, never read
//! cols  13..    one value series per region
//! ```
//!
//! Every offset lives here as a named field so the contract is checked
//! once, up front, instead of surfacing later as misaligned output.

use crate::error::{ReshapeError, ReshapeResult};
use crate::table::RawTable;

/// Grid offsets of an e-Stat extract, plus the attribute positions the
/// tidy output is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstatLayout {
    /// Row index of the header row.
    pub header_row: usize,
    /// Row index where data rows begin.
    pub data_start_row: usize,
    /// Number of leading attribute columns.
    pub attr_cols: usize,
    /// Column index of the first region series.
    pub region_start_col: usize,
    /// Attribute column holding the examination type.
    pub examination_col: usize,
    /// Attribute column holding the reporting month.
    pub month_col: usize,
    /// Attribute column holding the disposition stage.
    pub disposition_col: usize,
}

impl Default for EstatLayout {
    fn default() -> Self {
        Self {
            header_row: 10,
            data_start_row: 11,
            attr_cols: 12,
            region_start_col: 13,
            examination_col: 8,
            month_col: 5,
            disposition_col: 11,
        }
    }
}

impl EstatLayout {
    /// Minimum grid height: preamble, header and at least one data row.
    pub fn min_rows(&self) -> usize {
        self.data_start_row + 1
    }

    /// Minimum header width: attributes, spacer and at least one region.
    pub fn min_cols(&self) -> usize {
        self.region_start_col + 1
    }

    /// Number of region series the header declares.
    pub fn region_count(&self, table: &RawTable) -> usize {
        table
            .rows
            .get(self.header_row)
            .map(|header| header.len().saturating_sub(self.region_start_col))
            .unwrap_or(0)
    }

    /// Check the grid against this layout.
    ///
    /// Fails with counts in the message when the grid is too short to
    /// hold a data row or the header row ends before the first region
    /// series.
    pub fn validate(&self, table: &RawTable) -> ReshapeResult<()> {
        if table.rows.len() < self.min_rows() {
            return Err(ReshapeError::TooFewRows {
                found: table.rows.len(),
                required: self.min_rows(),
            });
        }

        let header_len = table.rows[self.header_row].len();
        if header_len < self.min_cols() {
            return Err(ReshapeError::NoRegionColumns {
                found: header_len,
                required: self.min_cols(),
            });
        }

        Ok(())
    }
}
