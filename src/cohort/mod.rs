//! Cohort progress derivation.
//!
//! An upstream extraction step turns the monthly progress report into a
//! JSON array of cohort records. This module takes that array, checks
//! each record against the embedded schema, coerces the count fields,
//! derives the approval totals and activity rate, and writes the
//! result as UTF-8 CSV with a BOM.
//!
//! Invalid records are skipped, not fatal: the report text the numbers
//! come from is messy and one bad month should not block the rest. A
//! run where nothing validates is an error.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CohortError, CohortResult};
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::CohortRow;
use crate::reshape::clean::clean_count;
use crate::table::write_csv_with_bom;
use crate::validation::validate_cohort_record;

/// Input the extraction step writes its structured records to.
pub const DEFAULT_INPUT: &str = "data/raw/xhs_cohort.json";

/// Output consumed by the cohort dashboard.
pub const DEFAULT_OUTPUT: &str = "data/processed/xhs_cohort_progress.csv";

/// Result of a complete cohort derivation run.
#[derive(Debug, Clone, Serialize)]
pub struct CohortSummary {
    /// Derived rows, in input order.
    pub rows: Vec<CohortRow>,
    /// Records skipped because they failed validation.
    pub skipped: usize,
    /// Where the derived table was written.
    pub output_path: PathBuf,
}

static MONTH_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{4}|\d{2})\s*[年/.-]\s*(\d{1,2})\s*月?\s*$")
        .expect("month pattern is valid")
});

/// Normalize a month string to `YYYY-MM`.
///
/// Accepts `2024-3`, `2024/03`, `2024.3`, `2024年3月` and the report
/// shorthand `24年3月`. Returns `None` for anything else so the caller
/// can decide to keep the original.
pub fn normalize_month(raw: &str) -> Option<String> {
    let caps = MONTH_SHAPE.captures(raw)?;

    let month: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let year_digits = &caps[1];
    let year: u32 = match year_digits.len() {
        4 => year_digits.parse().ok()?,
        // Two-digit years only in the CJK form, "24-3" stays ambiguous
        2 if raw.contains('年') => 2000 + year_digits.parse::<u32>().ok()?,
        _ => return None,
    };

    Some(format!("{:04}-{:02}", year, month))
}

/// Coerce a JSON count field to an integer. Never fails.
///
/// Numbers truncate toward zero, numeric strings go through the same
/// cleaning as e-Stat cells, everything else becomes 0.
pub fn coerce_count(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i,
            None => n
                .as_f64()
                .map(|f| if f.is_finite() { f as i64 } else { 0 })
                .unwrap_or(0),
        },
        Some(Value::String(s)) => clean_count(Some(s)),
        _ => 0,
    }
}

/// Movement over applications, rounded to 4 decimals.
///
/// 0.0 when nothing was applied, so the rate column never carries
/// infinities into the dashboard.
pub fn activity_rate(movement_total: i64, total_applied: i64) -> f64 {
    if total_applied == 0 {
        return 0.0;
    }
    let rate = movement_total as f64 / total_applied as f64;
    (rate * 10_000.0).round() / 10_000.0
}

/// Derive one output row from a validated record.
///
/// `today` is the `Last_Updated` stamp, passed in so runs are
/// reproducible under test.
pub fn derive_row(record: &Value, today: &str) -> CohortRow {
    let raw_month = record.get("Month").and_then(Value::as_str).unwrap_or("");
    let month = normalize_month(raw_month).unwrap_or_else(|| raw_month.to_string());

    let total_applied = coerce_count(record.get("Total_Applied"));
    let approved_main = coerce_count(record.get("Approved_Main"));
    let approved_family = coerce_count(record.get("Approved_Family"));
    let rfe_count = coerce_count(record.get("RFE_Count"));

    let total_approved = approved_main + approved_family;
    let movement_total = total_approved + rfe_count;

    CohortRow {
        month,
        total_applied,
        approved_main,
        approved_family,
        rfe_count,
        notes: record
            .get("Notes")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        total_approved,
        movement_total,
        activity_rate: activity_rate(movement_total, total_applied),
        last_updated: today.to_string(),
    }
}

/// Derive cohort progress from a JSON export file.
///
/// This is the main entry point for the cohort pipeline. It:
/// 1. Checks the input exists
/// 2. Parses the JSON array
/// 3. Validates every record, skipping invalid ones with a warning
/// 4. Coerces counts and derives totals, rate and the update stamp
/// 5. Writes the result as UTF-8 with a BOM, creating directories
pub fn derive_cohort(input: &Path, output: &Path) -> CohortResult<CohortSummary> {
    if !input.exists() {
        return Err(CohortError::InputNotFound(input.to_path_buf()));
    }

    log_info(format!("📖 Reading {}", input.display()));
    let content = fs::read_to_string(input)?;
    let records: Vec<Value> = serde_json::from_str(&content)?;
    if records.is_empty() {
        return Err(CohortError::EmptyInput);
    }
    log_success(format!("Read {} records", records.len()));

    let today = Local::now().format("%Y-%m-%d").to_string();

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (i, record) in records.iter().enumerate() {
        match validate_cohort_record(record) {
            Ok(()) => {
                let row = derive_row(record, &today);
                if normalize_month(&row.month).is_none() {
                    log_warning(format!(
                        "Record {}: unrecognized month '{}', kept as written",
                        i, row.month
                    ));
                }
                if row.total_applied == 0 {
                    log_warning(format!(
                        "Record {}: Total_Applied is 0, activity rate set to 0",
                        i
                    ));
                }
                rows.push(row);
            }
            Err(errors) => {
                skipped += 1;
                if skipped <= 5 {
                    log_error(format!("Record {} skipped: {}", i, errors.join(", ")));
                }
            }
        }
    }

    if rows.is_empty() {
        return Err(CohortError::AllInvalid(records.len()));
    }
    if skipped > 0 {
        log_warning(format!("{} of {} records skipped", skipped, records.len()));
    }

    write_csv_with_bom(output, &rows)?;
    log_success(format!("解析完了: {}", output.display()));

    Ok(CohortSummary {
        rows,
        skipped,
        output_path: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::UTF8_BOM;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_month_shapes() {
        assert_eq!(normalize_month("2024-03"), Some("2024-03".into()));
        assert_eq!(normalize_month("2024-3"), Some("2024-03".into()));
        assert_eq!(normalize_month("2024/3"), Some("2024-03".into()));
        assert_eq!(normalize_month("2024.3"), Some("2024-03".into()));
        assert_eq!(normalize_month("2024年3月"), Some("2024-03".into()));
        assert_eq!(normalize_month("24年3月"), Some("2024-03".into()));
        assert_eq!(normalize_month(" 2024-12 "), Some("2024-12".into()));
    }

    #[test]
    fn test_normalize_month_rejects_ambiguous() {
        assert_eq!(normalize_month("24-3"), None);
        assert_eq!(normalize_month("2024-13"), None);
        assert_eq!(normalize_month("2024-0"), None);
        assert_eq!(normalize_month("March 2024"), None);
        assert_eq!(normalize_month(""), None);
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(Some(&json!(40))), 40);
        assert_eq!(coerce_count(Some(&json!(40.7))), 40);
        assert_eq!(coerce_count(Some(&json!("95"))), 95);
        assert_eq!(coerce_count(Some(&json!("1,234"))), 1234);
        assert_eq!(coerce_count(Some(&json!("-"))), 0);
        assert_eq!(coerce_count(Some(&json!("abc"))), 0);
        assert_eq!(coerce_count(Some(&json!(null))), 0);
        assert_eq!(coerce_count(Some(&json!(true))), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn test_activity_rate_rounds_to_four_decimals() {
        assert_eq!(activity_rate(57, 120), 0.475);
        assert_eq!(activity_rate(1, 3), 0.3333);
        assert_eq!(activity_rate(2, 3), 0.6667);
        assert_eq!(activity_rate(0, 50), 0.0);
    }

    #[test]
    fn test_activity_rate_zero_denominator() {
        assert_eq!(activity_rate(57, 0), 0.0);
        assert_eq!(activity_rate(0, 0), 0.0);
    }

    #[test]
    fn test_derive_row_totals() {
        let record = json!({
            "Month": "2024-3",
            "Total_Applied": 120,
            "Approved_Main": 40,
            "Approved_Family": "12",
            "RFE_Count": 5,
            "Notes": "家族帯同の承認が増加"
        });
        let row = derive_row(&record, "2026-08-23");

        assert_eq!(row.month, "2024-03");
        assert_eq!(row.total_approved, 52);
        assert_eq!(row.movement_total, 57);
        assert_eq!(row.activity_rate, 0.475);
        assert_eq!(row.notes, "家族帯同の承認が増加");
        assert_eq!(row.last_updated, "2026-08-23");
    }

    #[test]
    fn test_derive_row_missing_counts_become_zero() {
        let record = json!({ "Month": "2024-07" });
        let row = derive_row(&record, "2026-08-23");

        assert_eq!(row.total_applied, 0);
        assert_eq!(row.total_approved, 0);
        assert_eq!(row.movement_total, 0);
        assert_eq!(row.activity_rate, 0.0);
        assert_eq!(row.notes, "");
    }

    #[test]
    fn test_derive_cohort_end_to_end() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("xhs_cohort.json");
        let output = dir.path().join("processed/xhs_cohort_progress.csv");

        let records = json!([
            {
                "Month": "2024-1",
                "Total_Applied": 100,
                "Approved_Main": 30,
                "Approved_Family": 10,
                "RFE_Count": 4,
                "Notes": "年明けで提出増"
            },
            { "Total_Applied": 50 },
            {
                "Month": "2024-02",
                "Total_Applied": "80",
                "Approved_Main": null,
                "Approved_Family": 2,
                "RFE_Count": 0
            }
        ]);
        fs::write(&input, serde_json::to_string_pretty(&records).unwrap()).unwrap();

        let summary = derive_cohort(&input, &output).unwrap();
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.skipped, 1);

        let first = &summary.rows[0];
        assert_eq!(first.month, "2024-01");
        assert_eq!(first.movement_total, 44);
        assert_eq!(first.activity_rate, 0.44);

        let second = &summary.rows[1];
        assert_eq!(second.total_applied, 80);
        assert_eq!(second.total_approved, 2);
        assert_eq!(second.activity_rate, 0.025);

        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "Month,Total_Applied,Approved_Main,Approved_Family,RFE_Count,Notes,\
             Total_Approved,Movement_Total,Activity_Rate,Last_Updated"
        );
        assert_eq!(text.lines().count(), 3);

        let stamp = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
        assert!(stamp.is_match(&first.last_updated));
    }

    #[test]
    fn test_derive_cohort_all_invalid() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.json");
        let output = dir.path().join("out.csv");
        fs::write(&input, r#"[{"Total_Applied": 1}, {"Month": ""}]"#).unwrap();

        assert!(matches!(
            derive_cohort(&input, &output),
            Err(CohortError::AllInvalid(2))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_derive_cohort_empty_array() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.json");
        fs::write(&input, "[]").unwrap();

        assert!(matches!(
            derive_cohort(&input, &dir.path().join("out.csv")),
            Err(CohortError::EmptyInput)
        ));
    }

    #[test]
    fn test_derive_cohort_missing_input() {
        let dir = tempdir().unwrap();
        let result = derive_cohort(&dir.path().join("nope.json"), &dir.path().join("out.csv"));
        assert!(matches!(result, Err(CohortError::InputNotFound(_))));
    }

    #[test]
    fn test_derive_cohort_rejects_non_array() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("object.json");
        fs::write(&input, r#"{"Month": "2024-01"}"#).unwrap();

        assert!(matches!(
            derive_cohort(&input, &dir.path().join("out.csv")),
            Err(CohortError::JsonError(_))
        ));
    }
}
