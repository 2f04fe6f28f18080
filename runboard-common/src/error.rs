//! Common error types for Runboard

use crate::models::ValidationResult;
use thiserror::Error;

/// Common result type for Runboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types across the ingestion pipeline and configuration loading
///
/// `Io`, `Parse` and `MissingColumns` are structural: they abort an upload
/// before any row is checked and are reported as a single message.
/// `Validation` carries the full list of row-addressed problems.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input could not be decoded or tokenized as CSV
    #[error("CSV parsing failed: {0}")]
    Parse(String),

    /// Header row lacks one or more required columns
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// One or more rows failed validation (or there were no rows)
    #[error("{}", .0.errors.join("; "))]
    Validation(ValidationResult),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl Error {
    /// Messages to show the user all at once
    ///
    /// Structural failures yield exactly one message; validation failures
    /// yield every accumulated row error in input order.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Error::Validation(result) => result.errors.clone(),
            other => vec![other.to_string()],
        }
    }

    /// True for failures that stopped ingestion before rows were checked
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::Parse(_) | Error::MissingColumns(_)
        )
    }
}
