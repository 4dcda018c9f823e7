//! Rust models matching the database schema.

use chrono::{DateTime, FixedOffset};
use seekback_common::{format_timestamp, SampleId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One logical recording.
///
/// `media` is never persisted; it is filled from a directory scan and left
/// empty on rows read straight from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub id: SampleId,
    pub start: DateTime<FixedOffset>,
    /// Playback length; zero while unknown.
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    pub end: Option<DateTime<FixedOffset>>,
    pub summary: String,
    pub transcript: String,
    #[serde(default)]
    pub media: Vec<String>,
}

impl Sample {
    /// A sample with only its identity filled in. `start` comes from the ID.
    pub fn new(id: SampleId) -> Self {
        let start = id.start_or_zero();
        Self {
            id,
            start,
            duration: Duration::ZERO,
            end: None,
            summary: String::new(),
            transcript: String::new(),
            media: Vec::new(),
        }
    }

    /// Whether the duration has been probed successfully.
    pub fn duration_known(&self) -> bool {
        !self.duration.is_zero()
    }

    /// `start + duration`, the value `end` should hold.
    pub fn computed_end(&self) -> DateTime<FixedOffset> {
        end_of(self.start, self.duration)
    }

    /// Interval covered by the recording. Uses the persisted end when set.
    pub fn time_range(&self) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (self.start, self.end.unwrap_or_else(|| self.computed_end()))
    }
}

/// A search result: the sample plus a highlighted excerpt.
///
/// `snippet` is empty when the search had no free-text query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    #[serde(flatten)]
    pub sample: Sample,
    pub snippet: String,
}

/// `start + duration`, saturating at `start` if the duration can't be
/// represented.
pub fn end_of(start: DateTime<FixedOffset>, duration: Duration) -> DateTime<FixedOffset> {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|d| start.checked_add_signed(d))
        .unwrap_or(start)
}

pub(crate) fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn to_sql_timestamp(t: &DateTime<FixedOffset>) -> String {
    format_timestamp(t)
}

pub(crate) fn duration_to_sql(d: Duration) -> i64 {
    i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
}

pub(crate) fn duration_from_sql(secs: i64) -> Duration {
    Duration::from_secs(secs.max(0) as u64)
}

impl Sample {
    /// Build from a row shaped `id, start, duration, "end", summary, transcript`.
    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let start: String = row.get(1)?;
        let end: Option<String> = row.get(3)?;
        Ok(Self {
            id: SampleId::from(row.get::<_, String>(0)?),
            start: parse_timestamp(1, &start)?,
            duration: duration_from_sql(row.get(2)?),
            end: end.as_deref().map(|s| parse_timestamp(3, s)).transpose()?,
            summary: row.get(4)?,
            transcript: row.get(5)?,
            media: Vec::new(),
        })
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
