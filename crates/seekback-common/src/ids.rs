//! Sample identifiers.
//!
//! A sample is identified by the stem its files share on disk. By convention
//! the stem is the moment the recording started, e.g.
//! `2006-01-02T15:04:05-07:00`.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// strftime layout of the timestamp embedded in a sample ID.
pub const SAMPLE_ID_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Identifier of a sample: the filename stem shared by its media and sidecars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(String);

impl SampleId {
    /// Wrap a filename stem.
    pub fn new(stem: impl Into<String>) -> Self {
        Self(stem.into())
    }

    /// The raw stem.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The start time encoded in the stem, if it follows [`SAMPLE_ID_LAYOUT`].
    pub fn start(&self) -> Option<DateTime<FixedOffset>> {
        parse_sample_timestamp(&self.0)
    }

    /// The encoded start time, or [`zero_time`] for stems that don't parse.
    pub fn start_or_zero(&self) -> DateTime<FixedOffset> {
        self.start().unwrap_or_else(zero_time)
    }

    /// Consume the ID, returning the stem.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SampleId {
    fn from(stem: String) -> Self {
        Self(stem)
    }
}

impl From<&str> for SampleId {
    fn from(stem: &str) -> Self {
        Self(stem.to_string())
    }
}

impl From<SampleId> for String {
    fn from(id: SampleId) -> Self {
        id.0
    }
}

impl AsRef<str> for SampleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a timestamp in the sample ID layout.
pub fn parse_sample_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, SAMPLE_ID_LAYOUT).ok()
}

/// `0001-01-01T00:00:00Z` in seconds since the Unix epoch.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// Start time given to samples whose ID is not a timestamp:
/// `0001-01-01T00:00:00Z`, well before any real recording.
pub fn zero_time() -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp(ZERO_TIME_SECS, 0)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .fixed_offset()
}

/// Whether `t` is the placeholder returned by [`zero_time`].
pub fn is_zero_time(t: &DateTime<FixedOffset>) -> bool {
    *t == zero_time()
}

/// Format a timestamp the way it is persisted (RFC 3339, whole seconds,
/// original offset kept).
pub fn format_timestamp(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, false)
}
