//! Date recognition for run records
//!
//! Accepted shapes:
//! - ISO `YYYY-MM-DD`
//! - US `M/D/YYYY` or `MM/DD/YYYY`
//! - EU `D-M-YYYY` or `DD-MM-YYYY`
//!
//! A string of the right shape must also name a real calendar date
//! (`2024-02-30` and `13/45/2024` are rejected). Dash-separated dates with a
//! short leading field are always read day-first, so `01-02-2024` is
//! 1 February 2024.

use chrono::NaiveDate;

/// Which of the accepted shapes a date string has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    Iso,
    /// `M/D/YYYY`, month first
    Us,
    /// `D-M-YYYY`, day first
    Eu,
}

impl DateFormat {
    /// Classify a trimmed date string by shape alone
    pub fn classify(raw: &str) -> Option<Self> {
        if let Some(parts) = split_fields(raw, '-') {
            if field_widths(&parts, &[4..=4, 2..=2, 2..=2]) {
                return Some(DateFormat::Iso);
            }
            if field_widths(&parts, &[1..=2, 1..=2, 4..=4]) {
                return Some(DateFormat::Eu);
            }
        }
        if let Some(parts) = split_fields(raw, '/') {
            if field_widths(&parts, &[1..=2, 1..=2, 4..=4]) {
                return Some(DateFormat::Us);
            }
        }
        None
    }
}

/// Resolve a date string to a calendar date
///
/// Returns `None` when the string has none of the accepted shapes or when the
/// fields do not form a real date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let format = DateFormat::classify(raw)?;
    let separator = if format == DateFormat::Us { '/' } else { '-' };
    let parts = split_fields(raw, separator)?;

    let numbers: Vec<u32> = parts
        .iter()
        .map(|p| p.parse::<u32>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    let (year, month, day) = match format {
        DateFormat::Iso => (numbers[0], numbers[1], numbers[2]),
        DateFormat::Us => (numbers[2], numbers[0], numbers[1]),
        DateFormat::Eu => (numbers[2], numbers[1], numbers[0]),
    };

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Resolve a date string and render it as the `YYYY-MM-DD` record key
pub fn normalize_date(raw: &str) -> Option<String> {
    parse_date(raw).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Split into exactly three all-digit fields
fn split_fields(raw: &str, separator: char) -> Option<Vec<&str>> {
    let parts: Vec<&str> = raw.split(separator).collect();
    if parts.len() != 3 {
        return None;
    }
    if parts
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    {
        Some(parts)
    } else {
        None
    }
}

fn field_widths(parts: &[&str], widths: &[std::ops::RangeInclusive<usize>; 3]) -> bool {
    parts
        .iter()
        .zip(widths.iter())
        .all(|(part, width)| width.contains(&part.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_accepted_shapes() {
        assert_eq!(DateFormat::classify("2024-01-15"), Some(DateFormat::Iso));
        assert_eq!(DateFormat::classify("1/5/2024"), Some(DateFormat::Us));
        assert_eq!(DateFormat::classify("01/15/2024"), Some(DateFormat::Us));
        assert_eq!(DateFormat::classify("15-01-2024"), Some(DateFormat::Eu));
        assert_eq!(DateFormat::classify("5-1-2024"), Some(DateFormat::Eu));
    }

    #[test]
    fn test_classify_rejects_other_shapes() {
        assert_eq!(DateFormat::classify(""), None);
        assert_eq!(DateFormat::classify("2024/01/15"), None);
        assert_eq!(DateFormat::classify("2024-1-15"), None);
        assert_eq!(DateFormat::classify("15.01.2024"), None);
        assert_eq!(DateFormat::classify("Jan 15 2024"), None);
        assert_eq!(DateFormat::classify("01/15/24"), None);
        assert_eq!(DateFormat::classify("2024-01-15T10:00"), None);
        assert_eq!(DateFormat::classify("+1/15/2024"), None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2024-01-15"), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_parse_us_date_is_month_first() {
        assert_eq!(parse_date("1/15/2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_date("02/03/2024"), NaiveDate::from_ymd_opt(2024, 2, 3));
    }

    #[test]
    fn test_parse_eu_date_is_day_first() {
        assert_eq!(parse_date("15-01-2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
        // Ambiguous input resolves day-first
        assert_eq!(parse_date("01-02-2024"), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert_eq!(parse_date("13/45/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("00/10/2024"), None);
    }

    #[test]
    fn test_parse_accepts_leap_day() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2/29/2024"), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_normalize_date_renders_iso() {
        assert_eq!(normalize_date("1/5/2024").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("5-1-2024").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("2024-01-05").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("not a date"), None);
    }
}
