//! Search request parsing.
//!
//! The query builder lives in `seekback_db::queries::search`; this module
//! turns user input into [`SearchOptions`].

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use seekback_common::parse_sample_timestamp;

pub use seekback_db::queries::search::SearchOptions;

/// A time bound that couldn't be parsed.
#[derive(Debug, thiserror::Error)]
pub enum TimeArgError {
    #[error("empty timestamp")]
    Empty,

    #[error("unrecognised timestamp {0:?}: expected RFC 3339, YYYY-MM-DDTHH:MM[:SS] or @UNIX_SECONDS")]
    Unrecognised(String),

    #[error("timestamp {0:?} doesn't exist or is ambiguous in the local time zone")]
    AmbiguousLocal(String),
}

/// Parse a search bound.
///
/// Accepted forms:
/// - RFC 3339 (`2024-03-01T10:00:00+09:00`, `2024-03-01T01:00:00Z`)
/// - the sample ID layout, which is RFC 3339 without fractions
/// - `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS` in the local time zone
/// - `@<seconds since the epoch>`, as UTC
pub fn parse_time_arg(s: &str) -> Result<DateTime<FixedOffset>, TimeArgError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeArgError::Empty);
    }

    if let Some(secs) = s.strip_prefix('@') {
        return secs
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|t| t.fixed_offset())
            .ok_or_else(|| TimeArgError::Unrecognised(s.to_string()));
    }

    if let Some(t) = parse_sample_timestamp(s) {
        return Ok(t);
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t);
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| TimeArgError::Unrecognised(s.to_string()))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|t| t.fixed_offset())
        .ok_or_else(|| TimeArgError::AmbiguousLocal(s.to_string()))
}

/// Time bounds requested alongside a free-text query.
///
/// `overlap` and `contained` are shorthands that set two of the four bounds;
/// the explicit bounds are applied afterwards and win.
#[derive(Debug, Clone, Default)]
pub struct TimeFilter {
    pub overlap: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
    pub contained: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
    pub start_after: Option<DateTime<FixedOffset>>,
    pub start_before: Option<DateTime<FixedOffset>>,
    pub end_after: Option<DateTime<FixedOffset>>,
    pub end_before: Option<DateTime<FixedOffset>>,
}

impl TimeFilter {
    /// Combine with `query` into search options.
    pub fn into_options(self, query: impl Into<String>) -> SearchOptions {
        let mut options = SearchOptions::with_query(query);
        if let Some((a, b)) = self.overlap {
            options.set_overlap(a, b);
        }
        if let Some((a, b)) = self.contained {
            options.set_contained(a, b);
        }
        options.start_after = self.start_after.or(options.start_after);
        options.start_before = self.start_before.or(options.start_before);
        options.end_after = self.end_after.or(options.end_after);
        options.end_before = self.end_before.or(options.end_before);
        options
    }
}
