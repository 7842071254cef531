//! Domain models for the statmelt pipelines.
//!
//! This module contains the output row types written by the pipelines:
//!
//! - [`LongRecord`] - one observation of the tidy e-Stat table
//! - [`CohortRow`] - one month of derived cohort progress
//!
//! Both are serialized straight into CSV by the `csv` crate, so field
//! order is column order and the `rename` attributes are the header row.

use serde::{Deserialize, Serialize};

// =============================================================================
// Long-format e-Stat record
// =============================================================================

/// One row of the reshaped e-Stat table.
///
/// Each record pairs one source data row with one region series: the
/// examination attributes of the row, the region name, the bureau
/// derived from it, and the cleaned count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LongRecord {
    /// Examination type attribute.
    #[serde(rename = "在留資格審査")]
    pub examination: String,
    /// Region series name, exactly as written in the source header.
    #[serde(rename = "地域名")]
    pub region: String,
    /// Bureau prefix derived from the region name, empty when the name
    /// carries no bureau marker.
    #[serde(rename = "出入国管理局")]
    pub bureau: String,
    /// Reporting month attribute.
    #[serde(rename = "时间轴（月次）")]
    pub month: String,
    /// Disposition stage attribute (receipts vs. completions).
    #[serde(rename = "在留資格審査の受理・処理")]
    pub disposition: String,
    /// Cleaned count, placeholders and unparseable cells as 0.
    #[serde(rename = "件数")]
    pub count: i64,
}

// =============================================================================
// Derived cohort progress row
// =============================================================================

/// One month of cohort progress with derived totals and rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CohortRow {
    /// Reporting month, normalized to `YYYY-MM` when recognizable.
    #[serde(rename = "Month")]
    pub month: String,
    /// Applications submitted in the month.
    #[serde(rename = "Total_Applied")]
    pub total_applied: i64,
    /// Approvals for main applicants.
    #[serde(rename = "Approved_Main")]
    pub approved_main: i64,
    /// Approvals for accompanying family members.
    #[serde(rename = "Approved_Family")]
    pub approved_family: i64,
    /// Requests for additional evidence.
    #[serde(rename = "RFE_Count")]
    pub rfe_count: i64,
    /// Free-text notes carried through from the report.
    #[serde(rename = "Notes")]
    pub notes: String,
    /// Approved_Main + Approved_Family.
    #[serde(rename = "Total_Approved")]
    pub total_approved: i64,
    /// Total_Approved + RFE_Count.
    #[serde(rename = "Movement_Total")]
    pub movement_total: i64,
    /// Movement_Total / Total_Applied, rounded to 4 decimals; 0.0 when
    /// nothing was applied.
    #[serde(rename = "Activity_Rate")]
    pub activity_rate: f64,
    /// Date this row was derived, `YYYY-MM-DD`.
    #[serde(rename = "Last_Updated")]
    pub last_updated: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> LongRecord {
        LongRecord {
            examination: "在留資格認定証明書交付".into(),
            region: "東京出入国在留管理局".into(),
            bureau: "東京".into(),
            month: "2024年3月".into(),
            disposition: "受理_旧受け".into(),
            count: 1234,
        }
    }

    #[test]
    fn test_long_record_header_row() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(sample_record()).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = data.lines().next().unwrap();

        assert_eq!(
            header,
            "在留資格審査,地域名,出入国管理局,时间轴（月次）,在留資格審査の受理・処理,件数"
        );
    }

    #[test]
    fn test_long_record_field_order_matches_header() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(sample_record()).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let row = data.lines().nth(1).unwrap();

        assert_eq!(
            row,
            "在留資格認定証明書交付,東京出入国在留管理局,東京,2024年3月,受理_旧受け,1234"
        );
    }

    #[test]
    fn test_cohort_row_header_row() {
        let row = CohortRow {
            month: "2024-03".into(),
            total_applied: 120,
            approved_main: 40,
            approved_family: 12,
            rfe_count: 5,
            notes: "".into(),
            total_approved: 52,
            movement_total: 57,
            activity_rate: 0.475,
            last_updated: "2026-08-23".into(),
        };
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(row).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = data.lines().next().unwrap();

        assert_eq!(
            header,
            "Month,Total_Applied,Approved_Main,Approved_Family,RFE_Count,Notes,\
             Total_Approved,Movement_Total,Activity_Rate,Last_Updated"
        );
    }
}
