//! Statistics aggregation
//!
//! Pure functions from a record slice to overall and per-runner statistics.
//! Nothing is cached; the same input always produces the same output.
//!
//! Rounding: totals and means are rounded to 2 decimal places once, at the
//! end. Means divide the unrounded sum. Minimum and maximum are taken over
//! raw values.

use crate::models::{OverallMetrics, RunRecord, RunnerStatistics};
use std::collections::{HashMap, HashSet};

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Grouping key for a person: trimmed and lower-cased
pub fn runner_key(person: &str) -> String {
    person.trim().to_lowercase()
}

/// Running totals for one group of distances
#[derive(Debug, Clone)]
struct MilesAccumulator {
    sum: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl MilesAccumulator {
    fn new(first: f64) -> Self {
        Self {
            sum: first,
            min: first,
            max: first,
            count: 1,
        }
    }

    fn add(&mut self, miles: f64) {
        self.sum += miles;
        self.min = self.min.min(miles);
        self.max = self.max.max(miles);
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Compute overall statistics across all run records
///
/// An empty slice yields all-zero metrics.
pub fn calculate_overall_metrics(records: &[RunRecord]) -> OverallMetrics {
    let Some((first, rest)) = records.split_first() else {
        return OverallMetrics::default();
    };

    let mut totals = MilesAccumulator::new(first.miles_run());
    for record in rest {
        totals.add(record.miles_run());
    }

    let unique_runners = records
        .iter()
        .map(|r| runner_key(r.person()))
        .collect::<HashSet<_>>()
        .len();

    OverallMetrics {
        total_runs: totals.count,
        total_miles: round2(totals.sum),
        average_miles_per_run: round2(totals.mean()),
        minimum_miles: totals.min,
        maximum_miles: totals.max,
        unique_runners,
    }
}

/// Compute per-runner statistics, highest total first
///
/// Runners are grouped by [`runner_key`]; each group's display name is the
/// first spelling seen. Equal totals keep first-seen order.
pub fn calculate_runner_stats(records: &[RunRecord]) -> Vec<RunnerStatistics> {
    // Insertion-ordered groups: index lookup by key, accumulators by first appearance
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, MilesAccumulator)> = Vec::new();

    for record in records {
        let key = runner_key(record.person());
        match index.get(&key) {
            Some(&i) => groups[i].1.add(record.miles_run()),
            None => {
                index.insert(key, groups.len());
                groups.push((
                    record.person().trim().to_string(),
                    MilesAccumulator::new(record.miles_run()),
                ));
            }
        }
    }

    let mut stats: Vec<RunnerStatistics> = groups
        .into_iter()
        .map(|(runner_name, acc)| RunnerStatistics {
            runner_name,
            total_miles: round2(acc.sum),
            average_miles: round2(acc.mean()),
            minimum_miles: acc.min,
            maximum_miles: acc.max,
            run_count: acc.count,
        })
        .collect();

    // sort_by is stable
    stats.sort_by(|a, b| b.total_miles.total_cmp(&a.total_miles));
    stats
}
