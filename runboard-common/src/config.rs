//! Configuration loading
//!
//! Bootstrap settings come from an optional TOML file. The file is located
//! in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `RUNBOARD_CONFIG` environment variable
//! 3. `<config dir>/runboard/config.toml` (e.g. `~/.config/runboard/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing file is not an error: a warning is logged and defaults are used.
//! A file that exists but does not parse is a [`Error::Config`].

use crate::charts::{ChartMetric, DEFAULT_DAILY_WINDOW};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RUNBOARD_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rendering configuration (optional)
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Parsed log level
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level.trim().parse::<LevelFilter>().map_err(|_| {
            Error::Config(format!(
                "Invalid log level '{}' (expected trace, debug, info, warn, error or off)",
                self.level
            ))
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Width in characters of the longest bar in text charts
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,

    /// Per-runner chart plots totals or averages
    #[serde(default)]
    pub chart_metric: ChartMetric,

    /// Most recent dates shown in the daily chart (0 = all dates)
    #[serde(default = "default_daily_window")]
    pub daily_window: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            bar_width: default_bar_width(),
            chart_metric: ChartMetric::default(),
            daily_window: default_daily_window(),
        }
    }
}

/// How results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Summary cards, bar chart and tables
    #[default]
    Text,
    /// Pretty-printed JSON for an external charting front end
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bar_width() -> usize {
    40
}

fn default_daily_window() -> usize {
    DEFAULT_DAILY_WINDOW
}

/// Locate the config file that should be read, if any
///
/// Returns the first candidate from the priority list. Only the platform
/// default is checked for existence; explicit paths are returned as given so
/// a missing file can be reported.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|path| path.exists())
}

/// `<config dir>/runboard/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("runboard").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    config.logging.level_filter()?;
    Ok(config)
}

/// Resolve and load configuration, falling back to defaults
///
/// Missing files degrade to defaults with a warning; parse failures are errors.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(cli_arg) else {
        debug!("No config file found, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(&path)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.bar_width, 40);
        assert_eq!(config.output.chart_metric, ChartMetric::Total);
        assert_eq!(config.output.daily_window, 10);
    }

    #[test]
    fn test_chart_settings_parse() {
        let config: TomlConfig =
            toml::from_str("[output]\nchart_metric = \"average\"\ndaily_window = 0\n").unwrap();
        assert_eq!(config.output.chart_metric, ChartMetric::Average);
        assert_eq!(config.output.daily_window, 0);
        assert!(toml::from_str::<TomlConfig>("[output]\nchart_metric = \"median\"\n").is_err());
    }

    #[test]
    fn test_level_filter() {
        let level = |name: &str| LoggingConfig {
            level: name.to_string(),
        };
        assert_eq!(level("debug").level_filter().unwrap(), LevelFilter::DEBUG);
        assert_eq!(level(" WARN ").level_filter().unwrap(), LevelFilter::WARN);
        assert_eq!(LoggingConfig::default().level_filter().unwrap(), LevelFilter::INFO);

        let err = level("verbos").level_filter().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("'verbos'"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.bar_width, 40);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(" TEXT ".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_cli_path_takes_priority() {
        let path = PathBuf::from("/tmp/runboard-cli.toml");
        assert_eq!(resolve_config_path(Some(path.as_path())), Some(path));
    }
}
