//! Reconciling the index with the samples directory.

use super::{set_minus, Storage};
use seekback_common::{Result, SampleId};
use seekback_db::models::Sample;
use seekback_db::pool::get_conn;
use seekback_db::queries::samples;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often a long sync reports progress.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// What a sync did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Samples found on disk.
    pub scanned: usize,
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Probe attempts, successful or not.
    pub probed: usize,
    /// Rows whose `end` was backfilled.
    pub ends_set: usize,
}

impl Storage {
    /// Bring the index in line with the samples directory.
    ///
    /// New samples are inserted with a probed duration, existing ones get
    /// their start and transcript refreshed, and rows with no files left are
    /// deleted. Summaries already in the index are never overwritten, and a
    /// known duration is never probed again. Probe failures are logged and
    /// leave the duration at zero so the next sync retries.
    ///
    /// Only one sync runs at a time; a second caller waits for the first.
    pub fn sync_files(&self) -> Result<SyncReport> {
        let _guard = self.sync_lock.lock();

        info!("Reading samples directory {:?}", self.samples_path);
        let found = self.sample_preview_list()?;
        info!("Syncing {} samples", found.len());

        let conn = get_conn(&self.pool)?;
        let mut report = SyncReport {
            scanned: found.len(),
            ..Default::default()
        };
        let mut progress = Progress::new(found.len());
        let mut on_disk: Vec<SampleId> = Vec::with_capacity(found.len());

        for (i, mut sample) in found.into_iter().enumerate() {
            progress.tick(i, &report);
            on_disk.push(sample.id.clone());

            match samples::get_sample(&conn, &sample.id)? {
                None => {
                    if let Some(duration) = self.probe_sample(&sample, &mut report) {
                        sample.duration = duration;
                    }
                    samples::insert_sample(&conn, &sample)?;
                    report.inserted += 1;
                }
                Some(existing) => {
                    sample.duration = existing.duration;
                    if !existing.duration_known() {
                        if let Some(duration) = self.probe_sample(&sample, &mut report) {
                            sample.duration = duration;
                        }
                    }
                    samples::update_sample_from_scan(
                        &conn,
                        &sample.id,
                        &sample.start,
                        sample.duration,
                        &sample.transcript,
                    )?;
                    report.updated += 1;
                }
            }
        }

        let indexed = samples::list_ids(&conn)?;
        let stale = set_minus(&indexed, &on_disk);
        info!("Deleting {} samples no longer on disk", stale.len());
        for id in &stale {
            samples::delete_sample(&conn, id)?;
        }
        report.deleted = stale.len();

        samples::rebuild_fts(&conn)?;
        report.ends_set = samples::set_missing_ends(&conn)?;

        info!(
            "Sync done: {} scanned, {} inserted, {} updated, {} deleted, {} probed",
            report.scanned, report.inserted, report.updated, report.deleted, report.probed
        );
        Ok(report)
    }

    /// Duration of the sample's first media file, or `None` if it can't be
    /// determined.
    fn probe_sample(&self, sample: &Sample, report: &mut SyncReport) -> Option<Duration> {
        let media = sample.media.first()?;
        let path = self.samples_path.join(media);
        report.probed += 1;
        match self.probe.probe_duration(&path) {
            Ok(duration) => {
                debug!("{} duration: {}s", sample.id, duration.as_secs());
                Some(duration)
            }
            Err(e) => {
                warn!("Failed to probe {:?} with {}: {}", path, self.probe.name(), e);
                None
            }
        }
    }
}

/// Rate-limited progress logging with an ETA.
struct Progress {
    total: usize,
    started: Instant,
    last_logged: Instant,
}

impl Progress {
    fn new(total: usize) -> Self {
        let now = Instant::now();
        Self {
            total,
            started: now,
            last_logged: now,
        }
    }

    fn tick(&mut self, index: usize, report: &SyncReport) {
        if self.last_logged.elapsed() < PROGRESS_INTERVAL {
            return;
        }
        self.last_logged = Instant::now();
        let elapsed = self.started.elapsed();
        info!(
            "Sync progress: {}/{} ({} inserted, {} updated, {} probed), about {}s left",
            index,
            self.total,
            report.inserted,
            report.updated,
            report.probed,
            remaining(elapsed, index, self.total).as_secs()
        );
    }
}

/// Time left if the remaining items take as long as the `done` so far.
fn remaining(elapsed: Duration, done: usize, total: usize) -> Duration {
    if done == 0 {
        return Duration::ZERO;
    }
    elapsed
        .mul_f64(total as f64 / done as f64)
        .saturating_sub(elapsed)
}
