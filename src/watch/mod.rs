//! Periodic resync of the samples directory.
//!
//! Every interval the watcher looks at the modification times in the samples
//! directory and runs a sync if anything changed since the last successful
//! one. Failures are logged and retried on the next tick.

use crate::storage::Storage;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Result of one watcher check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing newer than the last sync.
    Unchanged,
    /// A sync ran and succeeded.
    Synced,
    /// A sync ran and failed; the next tick will try again.
    SyncFailed,
    /// The directory couldn't be listed.
    ListFailed,
}

/// Polls the samples directory and syncs on change.
pub struct SyncWatcher {
    storage: Arc<Storage>,
    interval: Duration,
    last_sync: SystemTime,
}

impl SyncWatcher {
    /// A watcher that treats "now" as the last sync, so only changes made
    /// from here on trigger one.
    pub fn new(storage: Arc<Storage>, interval: Duration) -> Self {
        Self {
            storage,
            interval,
            last_sync: SystemTime::now(),
        }
    }

    /// Override the time of the last sync.
    pub fn with_last_sync(mut self, last_sync: SystemTime) -> Self {
        self.last_sync = last_sync;
        self
    }

    pub fn last_sync(&self) -> SystemTime {
        self.last_sync
    }

    /// Tick until `cancel` fires. The first check happens one interval in.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            "Watching {:?} every {}s",
            self.storage.samples_path(),
            self.interval.as_secs()
        );

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Sync watcher shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// Check once, syncing if needed.
    pub async fn tick(&mut self) -> TickOutcome {
        let dir = self.storage.samples_path().to_path_buf();
        let latest = match tokio::task::spawn_blocking(move || latest_modified(&dir)).await {
            Ok(Ok(latest)) => latest,
            Ok(Err(e)) => {
                tracing::warn!("Failed to list samples directory: {}", e);
                return TickOutcome::ListFailed;
            }
            Err(e) => {
                tracing::error!("Directory listing task failed: {}", e);
                return TickOutcome::ListFailed;
            }
        };

        if !needs_sync(latest, self.last_sync) {
            tracing::trace!("No changes since last sync");
            return TickOutcome::Unchanged;
        }

        tracing::info!("Samples directory changed, syncing");
        let storage = self.storage.clone();
        match tokio::task::spawn_blocking(move || storage.sync_files()).await {
            Ok(Ok(report)) => {
                self.last_sync = SystemTime::now();
                tracing::debug!("Watcher sync: {:?}", report);
                TickOutcome::Synced
            }
            Ok(Err(e)) => {
                tracing::error!("Sync failed: {}", e);
                TickOutcome::SyncFailed
            }
            Err(e) => {
                tracing::error!("Sync task failed: {}", e);
                TickOutcome::SyncFailed
            }
        }
    }
}

/// Latest modification time among `dir` itself and its direct entries.
///
/// The directory's own time catches removals. Entries that can't be
/// inspected are skipped; only failing to list `dir` is an error.
pub fn latest_modified(dir: &Path) -> io::Result<Option<SystemTime>> {
    let own = std::fs::metadata(dir).and_then(|m| m.modified());
    let entries = std::fs::read_dir(dir)?
        .map(|entry| entry.and_then(|e| e.metadata()).and_then(|m| m.modified()));
    Ok(max_modified(std::iter::once(own).chain(entries)))
}

/// Maximum of the successful times, logging and skipping the failures.
fn max_modified<I>(times: I) -> Option<SystemTime>
where
    I: IntoIterator<Item = io::Result<SystemTime>>,
{
    times
        .into_iter()
        .filter_map(|t| match t {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::debug!("Skipping entry: {}", e);
                None
            }
        })
        .max()
}

/// Whether something was modified strictly after `last_sync`.
pub fn needs_sync(latest: Option<SystemTime>, last_sync: SystemTime) -> bool {
    latest.is_some_and(|t| t > last_sync)
}
