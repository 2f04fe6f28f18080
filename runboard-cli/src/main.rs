//! runboard - Running activity dashboard
//!
//! Reads a CSV file of runs (date, person, miles run), validates every row and
//! prints overall and per-runner statistics. Rejected uploads list every
//! problem at once and exit with status 1.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use runboard_common::config::{load_config, OutputFormat};
use runboard_common::ChartMetric;
use runboard_cli::render::{render_json, render_text, RenderOptions};
use runboard_cli::session::{DisplaySlot, DisplayState};
use runboard_cli::upload::upload_once;
use runboard_cli::watch::watch_file;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for runboard
#[derive(Parser, Debug)]
#[command(name = "runboard")]
#[command(about = "Summarize a CSV log of runs per person")]
#[command(version)]
struct Args {
    /// CSV file with date, person and miles run columns
    file: PathBuf,

    /// Output format (text or json); overrides the config file
    #[arg(short, long, env = "RUNBOARD_FORMAT")]
    format: Option<OutputFormat>,

    /// Show the per-person view for this runner
    #[arg(short, long)]
    runner: Option<String>,

    /// Path to config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the longest chart bar; overrides the config file
    #[arg(long)]
    bar_width: Option<usize>,

    /// Per-runner chart metric (total or average); overrides the config file
    #[arg(short, long)]
    metric: Option<ChartMetric>,

    /// Most recent dates in the daily chart, 0 for all; overrides the config file
    #[arg(long)]
    days: Option<usize>,

    /// Re-run whenever the file changes
    #[arg(short, long)]
    watch: bool,

    /// Poll interval for --watch in milliseconds
    #[arg(long, default_value = "1000")]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing; level is refined once config is loaded
    let env_filter = EnvFilter::try_from_default_env();
    let rust_log_set = env_filter.is_ok();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|_| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting runboard v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if !rust_log_set {
        let level = config.logging.level_filter()?;
        filter_handle
            .modify(|filter| *filter = EnvFilter::default().add_directive(level.into()))
            .context("Failed to apply configured log level")?;
    }

    let format = args.format.unwrap_or(config.output.format);
    let options = RenderOptions {
        runner: args.runner.clone(),
        bar_width: args.bar_width.unwrap_or(config.output.bar_width),
        metric: args.metric.unwrap_or(config.output.chart_metric),
        daily_window: args.days.unwrap_or(config.output.daily_window),
    };

    let slot = Arc::new(DisplaySlot::new());
    let mut rx = slot.subscribe();

    upload_once(&slot, &args.file).await;
    let first = rx
        .borrow_and_update()
        .clone()
        .context("Upload finished without a result")?;
    emit(&first.state, format, &options)?;

    if !args.watch {
        return Ok(if first.state.is_ready() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let shutdown = CancellationToken::new();
    let watcher = tokio::spawn(watch_file(
        args.file.clone(),
        Duration::from_millis(args.interval_ms),
        Arc::clone(&slot),
        shutdown.clone(),
    ));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping watch");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let published = rx.borrow_and_update().clone();
                if let Some(published) = published {
                    emit(&published.state, format, &options)?;
                }
            }
        }
    }

    shutdown.cancel();
    watcher.await.context("Watch task failed")?;
    Ok(ExitCode::SUCCESS)
}

fn emit(state: &DisplayState, format: OutputFormat, options: &RenderOptions) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(state, options)),
        OutputFormat::Json => println!(
            "{}",
            render_json(state, options).context("Failed to serialize report")?
        ),
    }
    Ok(())
}
