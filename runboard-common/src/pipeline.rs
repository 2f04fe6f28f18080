//! Upload pipeline: bytes → validated records → statistics
//!
//! Each call is an independent pass. Nothing from a previous upload is
//! consulted or retained.

use crate::charts::{self, ChartMetric};
use crate::error::Result;
use crate::ingest;
use crate::metrics::{calculate_overall_metrics, calculate_runner_stats, runner_key};
use crate::models::{
    ChartDataPoint, DailyRunData, OverallMetrics, RunRecord, RunnerComparisonPoint,
    RunnerStatistics,
};
use serde::Serialize;
use tracing::info;

/// Everything presentation needs from one accepted upload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub overall: OverallMetrics,
    /// Highest total first
    pub runners: Vec<RunnerStatistics>,
    pub records: Vec<RunRecord>,
}

/// The per-person dashboard for one runner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerView {
    pub stats: RunnerStatistics,
    pub timeline: Vec<DailyRunData>,
}

impl Dashboard {
    /// Aggregate an already-validated record list
    pub fn from_records(records: Vec<RunRecord>) -> Self {
        let overall = calculate_overall_metrics(&records);
        let runners = calculate_runner_stats(&records);
        Self {
            overall,
            runners,
            records,
        }
    }

    /// Total miles per runner, one bar each
    pub fn overall_chart(&self) -> Vec<ChartDataPoint> {
        charts::overall_chart(&self.runners)
    }

    /// Chosen metric per runner, one bar each
    pub fn runner_chart(&self, metric: ChartMetric) -> Vec<ChartDataPoint> {
        charts::runner_chart(&self.runners, metric)
    }

    pub fn runner_comparison(&self) -> Vec<RunnerComparisonPoint> {
        charts::runner_comparison(&self.runners)
    }

    /// Miles per date across all runners
    pub fn daily_totals(&self) -> Vec<DailyRunData> {
        charts::daily_totals(&self.records)
    }

    /// The latest `window` dates of [`Dashboard::daily_totals`]; 0 keeps all
    pub fn recent_daily_totals(&self, window: usize) -> Vec<DailyRunData> {
        charts::recent_daily_totals(&self.records, window)
    }

    /// Runner selector entries
    pub fn runner_names(&self) -> Vec<String> {
        charts::runner_names(&self.records)
    }

    /// Stats and timeline for one runner, matched case-insensitively
    pub fn runner_view(&self, name: &str) -> Option<RunnerView> {
        let key = runner_key(name);
        let stats = self
            .runners
            .iter()
            .find(|s| runner_key(&s.runner_name) == key)?
            .clone();
        let timeline = charts::runner_timeline(&self.records, name);
        Some(RunnerView { stats, timeline })
    }
}

/// Run one complete parse → validate → aggregate pass over uploaded bytes
pub fn analyze(bytes: &[u8]) -> Result<Dashboard> {
    let records = ingest::ingest(bytes)?;
    let dashboard = Dashboard::from_records(records);
    info!(
        runs = dashboard.overall.total_runs,
        runners = dashboard.overall.unique_runners,
        total_miles = dashboard.overall.total_miles,
        "Analyzed upload"
    );
    Ok(dashboard)
}
