use crate::storage::SampleLayout;
use seekback_common::MediaTypes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    /// Media extension → content type. Replaces the built-in table when set.
    #[serde(default)]
    pub media_types: MediaTypes,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// How sample files are recognised under this configuration.
    pub fn layout(&self) -> SampleLayout {
        SampleLayout {
            media: self.media_types.clone(),
            summary_ext: self.storage.summary_ext.clone(),
            transcript_ext: self.storage.transcript_ext.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the sample files (overridable with `SEEKBACK_SAMPLES_PATH`)
    #[serde(default = "default_samples_path")]
    pub samples_path: PathBuf,

    /// SQLite index file (overridable with `SEEKBACK_DB_PATH`)
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_summary_ext")]
    pub summary_ext: String,

    #[serde(default = "default_transcript_ext")]
    pub transcript_ext: String,
}

fn default_samples_path() -> PathBuf {
    PathBuf::from("./samples")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("db.sqlite3")
}

fn default_summary_ext() -> String {
    "txt".to_string()
}

fn default_transcript_ext() -> String {
    "vtt".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            samples_path: default_samples_path(),
            db_path: default_db_path(),
            summary_ext: default_summary_ext(),
            transcript_ext: default_transcript_ext(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Resync automatically when the samples directory changes
    #[serde(default = "default_watch_enabled")]
    pub enabled: bool,

    /// Seconds between checks (default: 60)
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_watch_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    60
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: default_watch_enabled(),
            interval_secs: default_interval(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// ffprobe binary; looked up on PATH when unset
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
