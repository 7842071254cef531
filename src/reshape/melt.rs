//! Wide-to-long pivot of the e-Stat grid.
//!
//! [`WideTable`] splits the validated grid into attribute labels,
//! region names and data rows; [`WideTable::melt`] then yields one
//! observation per (data row, region series) pair, region-major, the
//! stacking order analysts expect from a spreadsheet unpivot.

use crate::error::ReshapeResult;
use crate::reshape::layout::EstatLayout;
use crate::table::RawTable;

/// The data portion of an e-Stat extract, split for melting.
#[derive(Debug, Clone)]
pub struct WideTable {
    /// Attribute labels from the header row, trimmed, blanks replaced
    /// by positional `col_{i}` placeholders.
    pub attr_labels: Vec<String>,
    /// Region series names from the header row, exactly as written.
    pub region_names: Vec<String>,
    /// Attribute cells per data row, one entry per attribute column.
    pub attr_rows: Vec<Vec<String>>,
    /// Value cells per data row, one entry per region series.
    pub value_rows: Vec<Vec<String>>,
    /// Data rows that were narrower than the header and padded with
    /// empty cells.
    pub padded_rows: usize,
}

/// One observation produced by the melt.
#[derive(Debug, Clone, Copy)]
pub struct MeltedCell<'a> {
    /// Attribute cells of the source row, in layout order.
    pub attrs: &'a [String],
    /// Region series name, untrimmed.
    pub region: &'a str,
    /// Raw value cell, not yet cleaned.
    pub value: &'a str,
}

impl WideTable {
    /// Split a raw grid according to `layout`.
    ///
    /// Validates the layout first, then pads short data rows to the
    /// header width and drops columns beyond the last region series.
    pub fn from_table(table: &RawTable, layout: &EstatLayout) -> ReshapeResult<WideTable> {
        layout.validate(table)?;

        let header = &table.rows[layout.header_row];

        let attr_labels: Vec<String> = header[..layout.attr_cols]
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let trimmed = label.trim();
                if trimmed.is_empty() {
                    format!("col_{}", i)
                } else {
                    trimmed.to_string()
                }
            })
            .collect();

        let regions = layout.region_count(table);
        let width = layout.region_start_col + regions;
        let region_names: Vec<String> = header[layout.region_start_col..width].to_vec();

        let mut attr_rows = Vec::new();
        let mut value_rows = Vec::new();
        let mut padded_rows = 0;

        for row in &table.rows[layout.data_start_row..] {
            if row.len() < width {
                padded_rows += 1;
            }
            let cell = |c: usize| row.get(c).cloned().unwrap_or_default();
            attr_rows.push((0..layout.attr_cols).map(cell).collect());
            value_rows.push((layout.region_start_col..width).map(cell).collect());
        }

        Ok(WideTable {
            attr_labels,
            region_names,
            attr_rows,
            value_rows,
            padded_rows,
        })
    }

    /// Number of data rows.
    pub fn data_rows(&self) -> usize {
        self.attr_rows.len()
    }

    /// Number of region series.
    pub fn regions(&self) -> usize {
        self.region_names.len()
    }

    /// Yield every (data row, region) observation, region-major: all
    /// rows under the first region, then all rows under the second.
    ///
    /// Always produces exactly `data_rows() * regions()` cells.
    pub fn melt(&self) -> impl Iterator<Item = MeltedCell<'_>> {
        self.region_names
            .iter()
            .enumerate()
            .flat_map(move |(k, region)| {
                self.attr_rows
                    .iter()
                    .zip(self.value_rows.iter())
                    .map(move |(attrs, values)| MeltedCell {
                        attrs: attrs.as_slice(),
                        region: region.as_str(),
                        value: values[k].as_str(),
                    })
            })
    }
}
