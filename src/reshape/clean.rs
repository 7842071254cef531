//! Cell-level cleaning for e-Stat value columns.
//!
//! e-Stat publishes counts with thousands separators and marks missing
//! or suppressed data with placeholder cells (`-`, `***`, empty). The
//! cleaners here are total: every possible cell becomes an integer, and
//! a [`CellKind`] says how it got there so a run can report placeholder
//! versus garbage cells without changing the numbers.

use serde::Serialize;

/// How a raw cell was interpreted by [`clean_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Parsed as a number after separator and whitespace stripping.
    Numeric,
    /// Recognized no-data marker: missing cell, empty, `-` or `***`.
    Placeholder,
    /// Unparseable text, coerced to zero.
    Coerced,
}

/// Counts of cell interpretations over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub numeric: usize,
    pub placeholder: usize,
    pub coerced: usize,
}

impl CleanStats {
    pub fn record(&mut self, kind: CellKind) {
        match kind {
            CellKind::Numeric => self.numeric += 1,
            CellKind::Placeholder => self.placeholder += 1,
            CellKind::Coerced => self.coerced += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.numeric + self.placeholder + self.coerced
    }
}

/// Clean a count cell to an integer. Never fails.
///
/// Strips ASCII thousands separators and surrounding whitespace, maps
/// placeholders to 0, parses the rest as a float truncated toward zero,
/// and coerces anything unparseable to 0.
pub fn clean_count(value: Option<&str>) -> i64 {
    clean_count_classified(value).0
}

/// [`clean_count`] plus the [`CellKind`] that produced the value.
pub fn clean_count_classified(value: Option<&str>) -> (i64, CellKind) {
    let raw = match value {
        Some(v) => v,
        None => return (0, CellKind::Placeholder),
    };

    let stripped = raw.replace(',', "");
    let s = stripped.trim();
    if matches!(s, "" | "-" | "***") {
        return (0, CellKind::Placeholder);
    }

    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => (f as i64, CellKind::Numeric),
        _ => (0, CellKind::Coerced),
    }
}

/// Markers identifying a regional immigration bureau inside a region
/// name, longest first so the full office name wins.
const BUREAU_MARKERS: [&str; 2] = ["出入国在留管理局", "出入国管理局"];

/// Extract the bureau prefix from a region name.
///
/// Returns everything before the first bureau marker, or `""` when the
/// name carries none (branch offices, airports, totals).
pub fn bureau_prefix(region: &str) -> &str {
    for marker in BUREAU_MARKERS {
        if let Some(idx) = region.find(marker) {
            return &region[..idx];
        }
    }
    ""
}
