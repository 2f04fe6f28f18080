//! CSV ingestion
//!
//! Tokenizes uploaded bytes, resolves the required columns from the header
//! row and hands trimmed field text to [`crate::validate`].
//!
//! # Header rules
//! Header names are trimmed, lower-cased and have internal whitespace runs
//! collapsed before matching. Required columns:
//! - `date`
//! - `person`
//! - `miles run` (also accepted as `milesrun`)
//!
//! Extra columns are ignored. If any required column is missing the whole
//! upload fails with one [`Error::MissingColumns`] and no row is examined.

use crate::error::{Error, Result};
use crate::models::RunRecord;
use crate::validate;
use tracing::debug;

/// Header spellings accepted for the distance column
const MILES_HEADERS: [&str; 2] = ["miles run", "milesrun"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Trimmed field text for one data row, before any validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Row number as users count it: data index + 2 (the header is row 1)
    pub row_number: usize,
    pub date: String,
    pub person: String,
    pub miles: String,
}

/// Column positions of the required fields within each record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    date: usize,
    person: usize,
    miles: usize,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let position = |names: &[&str]| {
            normalized
                .iter()
                .position(|h| names.iter().any(|name| h == name))
        };

        let date = position(&["date"]);
        let person = position(&["person"]);
        let miles = position(&MILES_HEADERS);

        match (date, person, miles) {
            (Some(date), Some(person), Some(miles)) => Ok(Self {
                date,
                person,
                miles,
            }),
            _ => {
                let mut missing = Vec::new();
                if date.is_none() {
                    missing.push("date".to_string());
                }
                if person.is_none() {
                    missing.push("person".to_string());
                }
                if miles.is_none() {
                    missing.push(MILES_HEADERS[0].to_string());
                }
                Err(Error::MissingColumns(missing))
            }
        }
    }
}

/// Normalize a header cell for case- and whitespace-insensitive matching
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Tokenize CSV bytes into raw rows
///
/// Fails only on structural problems: undecodable input, tokenizer errors or
/// missing required columns. Empty lines are skipped by the tokenizer; a line
/// of bare delimiters is still a row and goes on to validation. Empty input
/// yields an empty row list, which validation reports as having no data.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        debug!("Upload is empty");
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let columns = ColumnMap::resolve(reader.headers()?)?;
    debug!(
        date = columns.date,
        person = columns.person,
        miles = columns.miles,
        "Resolved CSV columns"
    );

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let field = |index: usize| record.get(index).unwrap_or("").trim().to_string();
        rows.push(RawRow {
            row_number: index + 2,
            date: field(columns.date),
            person: field(columns.person),
            miles: field(columns.miles),
        });
    }

    debug!(rows = rows.len(), "Tokenized CSV upload");
    Ok(rows)
}

/// Full ingestion pass: tokenize then validate every row
///
/// Returns every record or nothing. Row problems come back as
/// [`Error::Validation`] holding the complete error list.
pub fn ingest(bytes: &[u8]) -> Result<Vec<RunRecord>> {
    let rows = read_rows(bytes)?;
    validate::validate_rows(&rows).map_err(Error::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Miles   Run "), "miles run");
        assert_eq!(normalize_header("DATE"), "date");
        assert_eq!(normalize_header("MilesRun"), "milesrun");
    }

    #[test]
    fn test_read_rows_trims_fields() {
        let rows = read_rows(b"date,person,miles run\n 2024-01-15 ,  John Doe , 5.2 \n").unwrap();
        assert_eq!(
            rows,
            vec![RawRow {
                row_number: 2,
                date: "2024-01-15".to_string(),
                person: "John Doe".to_string(),
                miles: "5.2".to_string(),
            }]
        );
    }

    #[test]
    fn test_read_rows_accepts_header_variants() {
        let rows = read_rows(b" Person , DATE ,MilesRun,notes\nJane,2024-01-16,3.8,easy\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].person, "Jane");
        assert_eq!(rows[0].date, "2024-01-16");
        assert_eq!(rows[0].miles, "3.8");
    }

    #[test]
    fn test_read_rows_missing_miles_column() {
        let err = read_rows(b"date,person\n2024-01-15,John\n").unwrap_err();
        match err {
            Error::MissingColumns(missing) => assert_eq!(missing, vec!["miles run".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_rows_lists_all_missing_columns() {
        let err = read_rows(b"when,who,distance\n2024-01-15,John,5\n").unwrap_err();
        match err {
            Error::MissingColumns(missing) => {
                assert_eq!(missing, vec!["date", "person", "miles run"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_rows_skips_empty_lines_only() {
        let csv = b"date,person,miles run\n\n2024-01-15,John,5\n , , \n2024-01-16,Jane,3\n";
        let rows = read_rows(csv).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_number, 3);
        assert_eq!(rows[1].person, "");
        assert_eq!(rows[2].row_number, 4);
        assert_eq!(rows[2].person, "Jane");
    }

    #[test]
    fn test_delimiter_row_keeps_later_row_numbers() {
        let csv = b"date,person,miles run\n2024-01-15,Ana,3\n,,\n2024-01-16,Bob,-1\n";
        match ingest(csv).unwrap_err() {
            Error::Validation(result) => assert_eq!(
                result.errors,
                vec![
                    "Row 3: Missing person name",
                    "Row 3: Missing date",
                    "Row 3: Missing miles value",
                    "Row 4: Miles cannot be negative",
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_rows_short_record_yields_empty_fields() {
        let rows = read_rows(b"date,person,miles run\n2024-01-15\n").unwrap();
        assert_eq!(rows[0].person, "");
        assert_eq!(rows[0].miles, "");
    }

    #[test]
    fn test_read_rows_strips_bom() {
        let rows = read_rows(b"\xEF\xBB\xBFdate,person,miles run\n2024-01-15,John,5\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_read_rows_empty_input() {
        assert!(read_rows(b"").unwrap().is_empty());
        assert!(read_rows(b"  \n\n").unwrap().is_empty());
    }

    #[test]
    fn test_read_rows_invalid_utf8_is_parse_error() {
        let err = read_rows(b"date,person,miles run\n2024-01-15,\xFF\xFE,5\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().starts_with("CSV parsing failed:"));
    }

    #[test]
    fn test_ingest_rejects_without_partial_commit() {
        let csv = b"date,person,miles run\n2024-01-15,John,5\n2024-01-16,Jane,-1\n";
        let err = ingest(csv).unwrap_err();
        match err {
            Error::Validation(result) => {
                assert!(!result.is_valid);
                assert_eq!(result.errors, vec!["Row 3: Miles cannot be negative"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
