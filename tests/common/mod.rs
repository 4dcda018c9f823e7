//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary samples directory, a
//! file-backed index and a [`Storage`] whose durations come from a
//! [`FakeProbe`] instead of ffprobe.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use seekback::storage::{SampleLayout, Storage};
use seekback_av::{DurationProbe, Error as AvError};
use seekback_db::pool::{init_pool, DbPool};
use tempfile::TempDir;

/// Probe with scripted answers, keyed by file name.
#[derive(Default)]
pub struct FakeProbe {
    durations: Mutex<HashMap<String, Duration>>,
    calls: AtomicUsize,
}

impl FakeProbe {
    /// Answer `duration` for `file_name` from now on.
    pub fn set(&self, file_name: &str, duration: Duration) {
        self.durations
            .lock()
            .unwrap()
            .insert(file_name.to_string(), duration);
    }

    /// Fail for `file_name` from now on.
    pub fn fail(&self, file_name: &str) {
        self.durations.lock().unwrap().remove(file_name);
    }

    /// Number of probe calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DurationProbe for FakeProbe {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn probe_duration(&self, path: &Path) -> seekback_av::Result<Duration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.durations
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .ok_or_else(|| AvError::tool_failed("fake", format!("no duration for {name}")))
    }
}

/// Temporary samples directory plus a storage indexing it.
pub struct TestHarness {
    pub storage: Arc<Storage>,
    pub probe: Arc<FakeProbe>,
    pub pool: DbPool,
    dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let samples = dir.path().join("samples");
        std::fs::create_dir(&samples).expect("failed to create samples dir");

        let db_path = dir.path().join("db.sqlite3");
        let pool = init_pool(db_path.to_str().expect("utf-8 temp path"))
            .expect("failed to open database");

        let probe = Arc::new(FakeProbe::default());
        let storage = Arc::new(Storage::new(
            samples,
            SampleLayout::default(),
            pool.clone(),
            probe.clone(),
        ));

        Self {
            storage,
            probe,
            pool,
            dir,
        }
    }

    pub fn samples_path(&self) -> PathBuf {
        self.storage.samples_path().to_path_buf()
    }

    /// Create or overwrite a file in the samples directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.samples_path().join(name);
        std::fs::write(&path, contents).expect("failed to write sample file");
        path
    }

    /// Remove a file from the samples directory.
    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.samples_path().join(name)).expect("failed to remove file");
    }

    /// Write `<id>.mp3` and tell the probe it lasts `secs` seconds.
    pub fn add_mp3(&self, id: &str, secs: u64) -> PathBuf {
        let name = format!("{id}.mp3");
        self.probe.set(&name, Duration::from_secs(secs));
        self.write(&name, "")
    }
}
