//! Upload handling: read a file, analyze it, publish the result
//!
//! Reading the file is the only suspension point. Once the bytes are in
//! hand, parsing, validation and aggregation run to completion synchronously.

use crate::session::{DisplaySlot, DisplayState};
use runboard_common::{analyze, Dashboard, Result};
use std::path::Path;
use tracing::{info, warn};

/// Read and analyze one CSV file
pub async fn process_file(path: &Path) -> Result<Dashboard> {
    let bytes = tokio::fs::read(path).await?;
    info!("Read {} bytes from {}", bytes.len(), path.display());
    analyze(&bytes)
}

/// Run one upload of `path` through `slot`
///
/// Returns true when the result was published, false when a newer upload
/// superseded this one first.
pub async fn upload_once(slot: &DisplaySlot, path: &Path) -> bool {
    let ticket = slot.begin().await;

    let state = tokio::select! {
        _ = ticket.token().cancelled() => {
            info!(generation = ticket.generation(), "Upload superseded while reading");
            return false;
        }
        result = process_file(path) => DisplayState::from_result(result),
    };

    if let DisplayState::Rejected(messages) = &state {
        warn!(
            errors = messages.len(),
            "Upload of {} rejected",
            path.display()
        );
    }

    slot.publish(&ticket, state).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_process_file_reads_and_analyzes() {
        let file = csv_file("date,person,miles run\n2024-01-15,John Doe,5.2\n");
        let dashboard = process_file(file.path()).await.unwrap();
        assert_eq!(dashboard.overall.total_runs, 1);
        assert_eq!(dashboard.runners[0].runner_name, "John Doe");
    }

    #[tokio::test]
    async fn test_missing_file_is_single_error() {
        let slot = DisplaySlot::new();
        let published = upload_once(&slot, Path::new("/nonexistent/runs.csv")).await;
        assert!(published);

        match slot.current().unwrap().state {
            DisplayState::Rejected(messages) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].starts_with("IO error:"));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_once_publishes_dashboard() {
        let file = csv_file("date,person,miles run\n2024-01-15,Ana,3\n2024-01-16,ana,4\n");
        let slot = DisplaySlot::new();
        assert!(upload_once(&slot, file.path()).await);

        let published = slot.current().unwrap();
        assert_eq!(published.generation, 1);
        match published.state {
            DisplayState::Ready(dashboard) => assert_eq!(dashboard.overall.unique_runners, 1),
            other => panic!("unexpected state: {other:?}"),
        }
    }
}
