//! Data model shared by ingestion, aggregation and presentation
//!
//! Field names serialize in camelCase so JSON output matches the types the
//! charting front end consumes (`milesRun`, `totalMiles`, `uniqueRunners`, ...).

use serde::Serialize;

/// One validated row of input: a date, a person and a distance
///
/// Constructed only by the ingestion pipeline once every check on its row has
/// passed, so holders may rely on:
/// - `date` is a real calendar date in `YYYY-MM-DD` form
/// - `person` is trimmed and non-empty
/// - `miles_run` is finite and within `0.0..=200.0`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    date: String,
    person: String,
    miles_run: f64,
}

impl RunRecord {
    pub(crate) fn new(date: String, person: String, miles_run: f64) -> Self {
        Self {
            date,
            person,
            miles_run,
        }
    }

    /// Normalized ISO date (`YYYY-MM-DD`)
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Display name as it appeared in the file (trimmed)
    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn miles_run(&self) -> f64 {
        self.miles_run
    }
}

/// Outcome of validating one ingestion attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Human-readable problems in input order, one per violated check
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Result with no problems
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Result whose validity is derived from whether any errors were found
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Aggregate statistics across all run records regardless of person
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallMetrics {
    pub total_runs: usize,
    /// Sum of all distances, rounded to 2 decimal places
    pub total_miles: f64,
    /// Unrounded sum divided by run count, rounded to 2 decimal places
    pub average_miles_per_run: f64,
    pub minimum_miles: f64,
    pub maximum_miles: f64,
    /// Distinct persons by trimmed, case-insensitive name
    pub unique_runners: usize,
}

/// Aggregate statistics within one runner's group of records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerStatistics {
    /// Display name from the first record seen for this runner
    pub runner_name: String,
    pub total_miles: f64,
    pub average_miles: f64,
    pub minimum_miles: f64,
    pub maximum_miles: f64,
    pub run_count: usize,
}

/// One bar of a categorical chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Total and average miles for one runner, plotted side by side
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerComparisonPoint {
    pub name: String,
    pub total_miles: f64,
    pub average_miles: f64,
}

/// Distance and run count on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRunData {
    /// ISO date (`YYYY-MM-DD`)
    pub date: String,
    pub miles: f64,
    pub runs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_from_errors() {
        assert!(ValidationResult::from_errors(Vec::new()).is_valid);
        assert_eq!(ValidationResult::from_errors(Vec::new()), ValidationResult::valid());

        let result = ValidationResult::from_errors(vec!["Row 2: Missing date".to_string()]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_overall_metrics_default_is_all_zero() {
        let metrics = OverallMetrics::default();
        assert_eq!(metrics.total_runs, 0);
        assert_eq!(metrics.total_miles, 0.0);
        assert_eq!(metrics.average_miles_per_run, 0.0);
        assert_eq!(metrics.minimum_miles, 0.0);
        assert_eq!(metrics.maximum_miles, 0.0);
        assert_eq!(metrics.unique_runners, 0);
    }

    #[test]
    fn test_record_accessors() {
        let record = RunRecord::new("2024-01-15".to_string(), "John Doe".to_string(), 5.2);
        assert_eq!(record.date(), "2024-01-15");
        assert_eq!(record.person(), "John Doe");
        assert_eq!(record.miles_run(), 5.2);
    }
}
