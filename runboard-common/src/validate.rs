//! Row validation
//!
//! Every row is checked independently and every problem is collected, so a
//! user can fix a whole file in one pass. A batch with any problem is rejected
//! as a whole.
//!
//! # Checks per row
//! 1. **Person**: non-empty after trimming
//! 2. **Date**: present, one of the accepted shapes (see [`crate::dates`]),
//!    and a real calendar date
//! 3. **Miles**: a finite number, not negative, not above
//!    [`MAX_PLAUSIBLE_MILES`]
//!
//! Messages are prefixed with `Row N:` using [`RawRow::row_number`].

use crate::dates;
use crate::ingest::RawRow;
use crate::models::{RunRecord, ValidationResult};
use tracing::{debug, warn};

/// Largest single-run distance accepted; anything above is rejected
pub const MAX_PLAUSIBLE_MILES: f64 = 200.0;

/// Message used when a file has no data rows at all
pub const NO_DATA_ROWS: &str = "CSV file contains no valid data rows";

/// Validate all rows and build records only if every row passes
pub fn validate_rows(rows: &[RawRow]) -> std::result::Result<Vec<RunRecord>, ValidationResult> {
    if rows.is_empty() {
        warn!("Rejected upload with no data rows");
        return Err(ValidationResult::from_errors(vec![NO_DATA_ROWS.to_string()]));
    }

    let mut errors = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        if let Some(record) = check_row(row, &mut errors) {
            records.push(record);
        }
    }

    if errors.is_empty() {
        debug!(records = records.len(), "All rows validated");
        Ok(records)
    } else {
        warn!(
            rows = rows.len(),
            errors = errors.len(),
            "Rejected upload with invalid rows"
        );
        Err(ValidationResult::from_errors(errors))
    }
}

/// Validate all rows, reporting only the outcome
pub fn check_rows(rows: &[RawRow]) -> ValidationResult {
    match validate_rows(rows) {
        Ok(_) => ValidationResult::valid(),
        Err(result) => result,
    }
}

/// Run every check on one row, appending one message per failed check
///
/// Returns the record when the row passed all checks.
fn check_row(row: &RawRow, errors: &mut Vec<String>) -> Option<RunRecord> {
    let n = row.row_number;
    let before = errors.len();

    if row.person.is_empty() {
        errors.push(format!("Row {n}: Missing person name"));
    }

    let date = if row.date.is_empty() {
        errors.push(format!("Row {n}: Missing date"));
        None
    } else {
        let normalized = dates::normalize_date(&row.date);
        if normalized.is_none() {
            errors.push(format!(
                "Row {n}: Invalid date format '{}' (expected YYYY-MM-DD, MM/DD/YYYY or DD-MM-YYYY)",
                row.date
            ));
        }
        normalized
    };

    let miles = check_miles(n, &row.miles, errors);

    match (date, miles) {
        (Some(date), Some(miles)) if errors.len() == before => {
            Some(RunRecord::new(date, row.person.clone(), miles))
        }
        _ => None,
    }
}

fn check_miles(n: usize, raw: &str, errors: &mut Vec<String>) -> Option<f64> {
    if raw.is_empty() {
        errors.push(format!("Row {n}: Missing miles value"));
        return None;
    }

    let Some(miles) = parse_miles(raw) else {
        errors.push(format!("Row {n}: Invalid miles value '{raw}'"));
        return None;
    };

    if miles < 0.0 {
        errors.push(format!("Row {n}: Miles cannot be negative"));
        None
    } else if miles > MAX_PLAUSIBLE_MILES {
        errors.push(format!(
            "Row {n}: Miles value ({}) seems unrealistic",
            display_miles(miles)
        ));
        None
    } else {
        Some(miles)
    }
}

/// Plain decimal for ordinary values, exponent form once digits would run long
fn display_miles(miles: f64) -> String {
    if miles.abs() >= 1e16 {
        format!("{miles:e}")
    } else {
        format!("{miles}")
    }
}

/// Parse a distance, rejecting anything that is not a finite number
pub fn parse_miles(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
