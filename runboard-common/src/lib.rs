//! # Runboard Common Library
//!
//! Shared code for the Runboard dashboard including:
//! - Run record data model
//! - CSV ingestion and row validation
//! - Overall and per-runner statistics
//! - Chart series preparation
//! - Configuration loading

pub mod charts;
pub mod config;
pub mod dates;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod validate;

pub use charts::ChartMetric;
pub use error::{Error, Result};
pub use models::{
    ChartDataPoint, DailyRunData, OverallMetrics, RunRecord, RunnerComparisonPoint,
    RunnerStatistics, ValidationResult,
};
pub use pipeline::{analyze, Dashboard, RunnerView};
