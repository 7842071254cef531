//! JSON Schema validation for cohort records.
//!
//! The cohort deriver consumes a JSON array produced by an upstream
//! extraction step it does not control, so every record is checked
//! against a schema before any arithmetic happens.
//!
//! # Embedded Schema
//!
//! The schema is embedded at compile time from the `schemas/`
//! directory and compiled once on first use:
//! - `cohort-record.json` (Draft 7)
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use statmelt::validate_cohort_record;
//!
//! let record = json!({
//!     "Month": "2024-03",
//!     "Total_Applied": 120,
//!     "Approved_Main": "40",
//!     "RFE_Count": null
//! });
//! assert!(validate_cohort_record(&record).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static COHORT_RECORD_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/cohort-record.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON object against a JSON schema.
///
/// # Arguments
/// * `schema` - The JSON schema (already parsed)
/// * `data` - The object to validate
///
/// # Returns
/// * `Ok(())` when valid
/// * `Err(Vec<String>)` with the errors when invalid
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Simpler version: just returns true/false.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate one cohort record against the embedded schema.
pub fn validate_cohort_record(data: &Value) -> Result<(), Vec<String>> {
    validate(&COHORT_RECORD_SCHEMA, data)
}

/// Quick check against the embedded cohort record schema.
pub fn is_valid_cohort_record(data: &Value) -> bool {
    is_valid(&COHORT_RECORD_SCHEMA, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_record() {
        let record = json!({
            "Month": "2024-03",
            "Total_Applied": 120,
            "Approved_Main": 40,
            "Approved_Family": 12,
            "RFE_Count": 5,
            "Notes": "書類審査が加速"
        });
        assert!(validate_cohort_record(&record).is_ok());
    }

    #[test]
    fn test_counts_may_be_strings_or_null() {
        let record = json!({
            "Month": "2024-04",
            "Total_Applied": "95",
            "Approved_Main": null,
            "Notes": null
        });
        assert!(is_valid_cohort_record(&record));
    }

    #[test]
    fn test_missing_month_rejected() {
        let record = json!({ "Total_Applied": 120 });
        let result = validate_cohort_record(&record);
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_empty_month_rejected() {
        let record = json!({ "Month": "" });
        assert!(!is_valid_cohort_record(&record));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(!is_valid_cohort_record(&json!("2024-03")));
        assert!(!is_valid_cohort_record(&json!(null)));
    }

    #[test]
    fn test_count_object_rejected() {
        let record = json!({
            "Month": "2024-05",
            "Total_Applied": { "value": 10 }
        });
        assert!(!is_valid_cohort_record(&record));
    }
}
