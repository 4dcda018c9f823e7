//! The sample repository.
//!
//! [`Storage`] owns the samples directory and the SQLite index built from it.
//! Reads come from the filesystem, the index, or both; writes to summaries go
//! to the index and writes to transcripts go to the sidecar on disk, which
//! the next sync copies into the index.

mod scan;
pub mod set;
mod sync;

pub use set::set_minus;
pub use sync::SyncReport;

use parking_lot::Mutex;
use seekback_av::DurationProbe;
use seekback_common::paths::sidecar_file_name;
use seekback_common::{Error, MediaTypes, Result, SampleId};
use seekback_db::models::{Sample, SearchHit};
use seekback_db::pool::{get_conn, DbPool};
use seekback_db::queries::{samples, search};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use seekback_db::queries::search::SearchOptions;

/// How sample files are recognised on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLayout {
    /// Media extensions. A stem needs at least one of these to be a sample.
    pub media: MediaTypes,
    /// Extension of the summary sidecar (`txt`).
    pub summary_ext: String,
    /// Extension of the transcript sidecar (`vtt`).
    pub transcript_ext: String,
}

impl Default for SampleLayout {
    fn default() -> Self {
        Self {
            media: MediaTypes::default(),
            summary_ext: "txt".to_string(),
            transcript_ext: "vtt".to_string(),
        }
    }
}

/// Samples directory plus its index.
pub struct Storage {
    samples_path: PathBuf,
    layout: SampleLayout,
    pool: DbPool,
    probe: Arc<dyn DurationProbe>,
    /// Held for the whole of a sync so two never interleave.
    sync_lock: Mutex<()>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("samples_path", &self.samples_path)
            .field("layout", &self.layout)
            .field("probe", &self.probe.name())
            .finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(
        samples_path: impl Into<PathBuf>,
        layout: SampleLayout,
        pool: DbPool,
        probe: Arc<dyn DurationProbe>,
    ) -> Self {
        Self {
            samples_path: samples_path.into(),
            layout,
            pool,
            probe,
            sync_lock: Mutex::new(()),
        }
    }

    pub fn samples_path(&self) -> &Path {
        &self.samples_path
    }

    pub fn layout(&self) -> &SampleLayout {
        &self.layout
    }

    /// Every sample currently on disk, sorted by ID. Durations are not probed
    /// and nothing is read from the index.
    pub fn sample_preview_list(&self) -> Result<Vec<Sample>> {
        scan::scan_samples(&self.samples_path, &self.layout)
    }

    /// One sample: media from disk, everything else from the index.
    ///
    /// Returns [`Error::NotFound`] when the index has no row for `id`, even if
    /// files exist; a sync has to pick them up first.
    pub fn sample_get(&self, id: &SampleId) -> Result<Sample> {
        check_id(id)?;
        let on_disk = scan::scan_sample(&self.samples_path, id, &self.layout)?;
        let conn = get_conn(&self.pool)?;
        let mut sample =
            samples::get_sample(&conn, id)?.ok_or_else(|| Error::not_found(id.as_str()))?;
        sample.media = on_disk.media;
        Ok(sample)
    }

    /// Every sample in the index, ordered by start time.
    pub fn sample_list(&self) -> Result<Vec<Sample>> {
        let conn = get_conn(&self.pool)?;
        samples::list_samples(&conn)
    }

    /// Overwrite the transcript sidecar of `id`. The index only sees the new
    /// text after the next sync.
    pub fn sample_transcript_set(&self, id: &SampleId, transcript: &str) -> Result<()> {
        check_id(id)?;
        let path = self
            .samples_path
            .join(sidecar_file_name(id.as_str(), &self.layout.transcript_ext));
        std::fs::write(&path, transcript)?;
        tracing::debug!("Wrote transcript {:?}", path);
        Ok(())
    }

    /// Replace the summary of an indexed sample. The summary sidecar on disk
    /// is left alone; the full-text index is rebuilt so the new text is
    /// searchable right away.
    pub fn sample_summary_set(&self, id: &SampleId, summary: &str) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        if !samples::set_summary(&conn, id, summary)? {
            return Err(Error::not_found(id.as_str()));
        }
        samples::rebuild_fts(&conn)
    }

    /// Names of every file sharing the stem `id`, media and sidecars alike.
    pub fn sample_files(&self, id: &SampleId) -> Result<Vec<String>> {
        check_id(id)?;
        scan::files_for(&self.samples_path, id)
    }

    /// Run a search against the index.
    pub fn search(&self, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        let conn = get_conn(&self.pool)?;
        search::search(&conn, options)
    }
}

/// IDs name files inside the samples directory and nothing else.
fn check_id(id: &SampleId) -> Result<()> {
    let s = id.as_str();
    if s.is_empty() || s == "." || s == ".." || s.contains(['/', '\\', '\0']) {
        return Err(Error::invalid_input(format!("bad sample id: {s:?}")));
    }
    Ok(())
}
