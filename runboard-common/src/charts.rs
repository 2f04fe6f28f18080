//! Chart series for the dashboard views
//!
//! - `runner_chart`: total or average miles per runner, one bar each
//! - `runner_comparison`: total and average side by side per runner
//! - `daily_totals`: miles and run count per date across all runners
//! - `recent_daily_totals`: the latest dates of `daily_totals`
//! - `runner_timeline`: the same per-date series for one runner
//! - `runner_names`: runner selector entries

use crate::metrics::{round2, runner_key};
use crate::models::{
    ChartDataPoint, DailyRunData, RunRecord, RunnerComparisonPoint, RunnerStatistics,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Dates shown by the daily activity chart unless configured otherwise
pub const DEFAULT_DAILY_WINDOW: usize = 10;

/// Which per-runner figure a runner chart plots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMetric {
    #[default]
    Total,
    Average,
}

impl ChartMetric {
    /// Chart heading, e.g. "Total Miles"
    pub fn title(self) -> &'static str {
        match self {
            ChartMetric::Total => "Total Miles",
            ChartMetric::Average => "Average Miles",
        }
    }

    fn value(self, stats: &RunnerStatistics) -> f64 {
        match self {
            ChartMetric::Total => stats.total_miles,
            ChartMetric::Average => stats.average_miles,
        }
    }
}

impl FromStr for ChartMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "total" => Ok(ChartMetric::Total),
            "average" | "avg" => Ok(ChartMetric::Average),
            other => Err(format!("unknown chart metric '{other}' (expected total or average)")),
        }
    }
}

impl fmt::Display for ChartMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartMetric::Total => write!(f, "total"),
            ChartMetric::Average => write!(f, "average"),
        }
    }
}

/// Bar chart points for total miles per runner, in statistics order
pub fn overall_chart(stats: &[RunnerStatistics]) -> Vec<ChartDataPoint> {
    runner_chart(stats, ChartMetric::Total)
}

/// Bar chart points for the chosen metric per runner, in statistics order
pub fn runner_chart(stats: &[RunnerStatistics], metric: ChartMetric) -> Vec<ChartDataPoint> {
    stats
        .iter()
        .map(|s| {
            let value = metric.value(s);
            ChartDataPoint {
                name: s.runner_name.clone(),
                value,
                label: Some(format!("{:.2} mi", value)),
            }
        })
        .collect()
}

/// Total and average miles per runner, in statistics order
pub fn runner_comparison(stats: &[RunnerStatistics]) -> Vec<RunnerComparisonPoint> {
    stats
        .iter()
        .map(|s| RunnerComparisonPoint {
            name: s.runner_name.clone(),
            total_miles: s.total_miles,
            average_miles: s.average_miles,
        })
        .collect()
}

/// Miles and run count per date across every runner, oldest date first
pub fn daily_totals(records: &[RunRecord]) -> Vec<DailyRunData> {
    group_by_date(records.iter())
}

/// The most recent `window` dates of [`daily_totals`], oldest first
///
/// A window of 0 keeps every date.
pub fn recent_daily_totals(records: &[RunRecord], window: usize) -> Vec<DailyRunData> {
    let mut days = daily_totals(records);
    if window > 0 && days.len() > window {
        let excess = days.len() - window;
        days.drain(..excess);
    }
    days
}

/// Per-date series for one runner, oldest date first
///
/// `runner` matches case-insensitively; an unknown runner yields an empty series.
pub fn runner_timeline(records: &[RunRecord], runner: &str) -> Vec<DailyRunData> {
    let key = runner_key(runner);
    group_by_date(records.iter().filter(|r| runner_key(r.person()) == key))
}

/// Distinct runner display names (first spelling seen), sorted case-insensitively
pub fn runner_names(records: &[RunRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names: Vec<String> = records
        .iter()
        .filter(|r| seen.insert(runner_key(r.person())))
        .map(|r| r.person().to_string())
        .collect();
    names.sort_by_key(|name| name.to_lowercase());
    names
}

fn group_by_date<'a>(records: impl Iterator<Item = &'a RunRecord>) -> Vec<DailyRunData> {
    // ISO date keys order chronologically
    let mut days: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        let day = days.entry(record.date()).or_insert((0.0, 0));
        day.0 += record.miles_run();
        day.1 += 1;
    }

    days.into_iter()
        .map(|(date, (miles, runs))| DailyRunData {
            date: date.to_string(),
            miles: round2(miles),
            runs,
        })
        .collect()
}
