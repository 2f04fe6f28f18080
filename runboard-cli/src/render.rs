//! Report generation and formatting
//!
//! Text output mirrors the dashboard sections: summary cards, daily activity
//! over the most recent dates, total or average miles by person, the runner
//! breakdown table and an optional runner view. JSON output carries the same data for an external charting front end.
//! All numbers are shown to 2 decimal places.

use crate::session::DisplayState;
use runboard_common::charts::DEFAULT_DAILY_WINDOW;
use runboard_common::{
    ChartDataPoint, ChartMetric, Dashboard, DailyRunData, OverallMetrics, RunnerComparisonPoint,
    RunnerView,
};
use serde::Serialize;
use std::fmt::Write;

/// Rendering options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Runner to show the per-person view for
    pub runner: Option<String>,
    /// Width in characters of the longest bar
    pub bar_width: usize,
    /// Figure plotted per runner
    pub metric: ChartMetric,
    /// Most recent dates in the daily chart (0 = all)
    pub daily_window: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            runner: None,
            bar_width: 40,
            metric: ChartMetric::Total,
            daily_window: DEFAULT_DAILY_WINDOW,
        }
    }
}

/// JSON document for one accepted upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport<'a> {
    pub overall: &'a OverallMetrics,
    pub runners: &'a [runboard_common::RunnerStatistics],
    pub runner_names: Vec<String>,
    pub chart_metric: ChartMetric,
    /// Per-runner bars for `chart_metric`
    pub overall_chart: Vec<ChartDataPoint>,
    pub runner_comparison: Vec<RunnerComparisonPoint>,
    /// Latest `daily_window` dates only
    pub daily_totals: Vec<DailyRunData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner_view: Option<RunnerView>,
}

/// JSON document for one rejected upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReport<'a> {
    pub is_valid: bool,
    pub errors: &'a [String],
}

/// Render a display state as JSON
pub fn render_json(state: &DisplayState, options: &RenderOptions) -> serde_json::Result<String> {
    match state {
        DisplayState::Ready(dashboard) => serde_json::to_string_pretty(&DashboardReport {
            overall: &dashboard.overall,
            runners: &dashboard.runners,
            runner_names: dashboard.runner_names(),
            chart_metric: options.metric,
            overall_chart: dashboard.runner_chart(options.metric),
            runner_comparison: dashboard.runner_comparison(),
            daily_totals: dashboard.recent_daily_totals(options.daily_window),
            runner_view: options
                .runner
                .as_deref()
                .and_then(|name| dashboard.runner_view(name)),
        }),
        DisplayState::Rejected(errors) => serde_json::to_string_pretty(&RejectionReport {
            is_valid: false,
            errors,
        }),
    }
}

/// Render a display state as text
pub fn render_text(state: &DisplayState, options: &RenderOptions) -> String {
    match state {
        DisplayState::Ready(dashboard) => render_dashboard(dashboard, options),
        DisplayState::Rejected(errors) => render_errors(errors),
    }
}

/// Error alert listing every problem
pub fn render_errors(errors: &[String]) -> String {
    let mut out = String::from("Validation Errors\n");
    for error in errors {
        let _ = writeln!(out, "  - {}", error);
    }
    out
}

fn render_dashboard(dashboard: &Dashboard, options: &RenderOptions) -> String {
    let mut out = String::new();

    section(&mut out, "Overall Statistics");
    out.push_str(&summary_cards(&dashboard.overall));

    if options.daily_window > 0 {
        section(
            &mut out,
            &format!("Daily Running Activity (last {} days)", options.daily_window),
        );
    } else {
        section(&mut out, "Daily Running Activity");
    }
    let daily: Vec<(String, f64)> = dashboard
        .recent_daily_totals(options.daily_window)
        .into_iter()
        .map(|d| (d.date, d.miles))
        .collect();
    out.push_str(&bar_chart(&daily, options.bar_width));

    section(&mut out, &format!("{} by Person", options.metric.title()));
    let by_person: Vec<(String, f64)> = dashboard
        .runner_chart(options.metric)
        .into_iter()
        .map(|p| (p.name, p.value))
        .collect();
    out.push_str(&bar_chart(&by_person, options.bar_width));

    section(&mut out, "Detailed Runner Breakdown");
    out.push_str(&runner_table(dashboard));

    if let Some(name) = options.runner.as_deref() {
        match dashboard.runner_view(name) {
            Some(view) => runner_view(&mut out, &view, options.bar_width),
            None => {
                section(&mut out, "Runner");
                let _ = writeln!(
                    out,
                    "No runs found for '{}'. Runners: {}",
                    name,
                    dashboard.runner_names().join(", ")
                );
            }
        }
    }

    out
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
}

/// Summary cards for the overall metrics
pub fn summary_cards(metrics: &OverallMetrics) -> String {
    let cards = [
        ("Total Runs", metrics.total_runs.to_string()),
        ("Total Miles", format!("{:.2}", metrics.total_miles)),
        ("Average Miles", format!("{:.2}", metrics.average_miles_per_run)),
        ("Minimum Miles", format!("{:.2}", metrics.minimum_miles)),
        ("Maximum Miles", format!("{:.2}", metrics.maximum_miles)),
        ("Unique Runners", metrics.unique_runners.to_string()),
    ];

    let mut out = String::new();
    for (title, value) in cards {
        let _ = writeln!(out, "{:<16}{:>10}", title, value);
    }
    out
}

/// Horizontal bars scaled so the largest value spans `width` characters
pub fn bar_chart(points: &[(String, f64)], width: usize) -> String {
    let label_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let max = points.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, value) in points {
        let len = if max > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<label_width$}  {} {:.2}",
            label,
            "#".repeat(len),
            value,
            label_width = label_width
        );
    }
    out
}

fn runner_table(dashboard: &Dashboard) -> String {
    let total = dashboard.overall.total_miles;
    let name_width = dashboard
        .runners
        .iter()
        .map(|s| s.runner_name.chars().count())
        .chain(std::iter::once("Runner Name".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$}  {:>11}  {:>9}  {:>7}  {:>7}  {:>4}  {:>6}",
        "Runner Name",
        "Total Miles",
        "Average",
        "Min",
        "Max",
        "Runs",
        "Share",
        w = name_width
    );
    for s in &dashboard.runners {
        let share = if total > 0.0 {
            s.total_miles / total * 100.0
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "{:<w$}  {:>11.2}  {:>9.2}  {:>7.2}  {:>7.2}  {:>4}  {:>5.0}%",
            s.runner_name,
            s.total_miles,
            s.average_miles,
            s.minimum_miles,
            s.maximum_miles,
            s.run_count,
            share,
            w = name_width
        );
    }
    out
}

fn runner_view(out: &mut String, view: &RunnerView, bar_width: usize) {
    section(out, &format!("Runner: {}", view.stats.runner_name));
    let _ = writeln!(out, "{:<16}{:>10.2}", "Total Miles", view.stats.total_miles);
    let _ = writeln!(out, "{:<16}{:>10.2}", "Average Miles", view.stats.average_miles);
    let _ = writeln!(out, "{:<16}{:>10.2}", "Minimum Miles", view.stats.minimum_miles);
    let _ = writeln!(out, "{:<16}{:>10.2}", "Maximum Miles", view.stats.maximum_miles);
    let _ = writeln!(out, "{:<16}{:>10}", "Runs", view.stats.run_count);
    out.push('\n');

    let points: Vec<(String, f64)> = view
        .timeline
        .iter()
        .map(|d| (d.date.clone(), d.miles))
        .collect();
    out.push_str(&bar_chart(&points, bar_width));
}
