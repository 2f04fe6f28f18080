//! Watch mode: re-upload a file whenever it changes
//!
//! The file's modification time is polled at a fixed interval. Each change
//! spawns a fresh upload; an upload still running when the next change lands
//! is superseded through the display slot.

use crate::session::DisplaySlot;
use crate::upload::upload_once;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

async fn modified_time(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok()
}

/// Poll `path` until `shutdown` is cancelled, uploading on every change
///
/// The file's state when watching starts is treated as already uploaded.
pub async fn watch_file(
    path: PathBuf,
    interval: Duration,
    slot: Arc<DisplaySlot>,
    shutdown: CancellationToken,
) {
    let mut last_seen = modified_time(&path).await;
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    info!("Watching {} every {:?}", path.display(), interval);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("Watch stopped");
                break;
            }
            _ = ticker.tick() => {
                let modified = modified_time(&path).await;
                if modified == last_seen {
                    continue;
                }
                last_seen = modified;
                info!("{} changed, re-uploading", path.display());

                let slot = Arc::clone(&slot);
                let path = path.clone();
                tokio::spawn(async move {
                    upload_once(&slot, &path).await;
                });
            }
        }
    }
}
