//! Sample search.
//!
//! Combines an optional FTS5 query with up to four time bounds. Bounds are
//! compared as seconds since the epoch so samples recorded under different
//! UTC offsets order correctly.

use chrono::{DateTime, FixedOffset};
use rusqlite::types::ToSql;
use rusqlite::Connection;
use seekback_common::{Error, Result};

use crate::models::{SearchHit, Sample};

/// Marker placed before and after each matched term in a snippet.
pub const SNIPPET_DELIMITER: &str = "**";

/// Marker placed where a snippet elides text.
pub const SNIPPET_ELLIPSIS: &str = "…";

/// Maximum number of tokens in a snippet.
pub const SNIPPET_TOKENS: u32 = 64;

/// Query descriptor for [`search`].
///
/// Every bound is optional; `None` means unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Full-text query in FTS5 syntax. Empty means no text filter.
    pub query: String,
    pub start_after: Option<DateTime<FixedOffset>>,
    pub start_before: Option<DateTime<FixedOffset>>,
    pub end_after: Option<DateTime<FixedOffset>>,
    pub end_before: Option<DateTime<FixedOffset>>,
}

impl SearchOptions {
    /// Options with only a text query.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Select samples whose `[start, end]` intersects `[start, end]` of the
    /// window.
    ///
    /// No reordering is done: a window with `start > end` matches nothing.
    pub fn set_overlap(&mut self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) {
        self.end_after = Some(start);
        self.start_before = Some(end);
    }

    /// Select samples whose `[start, end]` lies entirely inside the window.
    pub fn set_contained(&mut self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) {
        self.start_after = Some(start);
        self.end_before = Some(end);
    }

    /// Whether a text query is present.
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// Build the SQL and parameters for `options`.
///
/// Unset bounds contribute no predicate at all.
pub fn build_query(options: &SearchOptions) -> (String, Vec<Box<dyn ToSql>>) {
    let mut sql;
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if options.has_query() {
        sql = format!(
            r#"SELECT s.id, s.start, s.duration, s."end", s.summary, s.transcript,
       snippet(samples_fts, -1, '{d}', '{d}', '{e}', {n}) AS snippet
FROM samples_fts
JOIN samples AS s ON s.rowid = samples_fts.rowid"#,
            d = SNIPPET_DELIMITER,
            e = SNIPPET_ELLIPSIS,
            n = SNIPPET_TOKENS,
        );
        conditions.push("samples_fts MATCH ?");
        params.push(Box::new(options.query.clone()));
    } else {
        sql = String::from(
            r#"SELECT s.id, s.start, s.duration, s."end", s.summary, s.transcript,
       '' AS snippet
FROM samples AS s"#,
        );
    }

    let bounds = [
        (options.start_after, "unixepoch(s.start) >= ?"),
        (options.start_before, "unixepoch(s.start) <= ?"),
        (options.end_after, r#"unixepoch(s."end") >= ?"#),
        (options.end_before, r#"unixepoch(s."end") <= ?"#),
    ];
    for (bound, predicate) in bounds {
        if let Some(t) = bound {
            conditions.push(predicate);
            params.push(Box::new(t.timestamp()));
        }
    }

    if !conditions.is_empty() {
        sql.push_str("\nWHERE ");
        sql.push_str(&conditions.join("\n  AND "));
    }

    if options.has_query() {
        sql.push_str("\nORDER BY samples_fts.rank");
    }

    (sql, params)
}

/// Run a search.
///
/// With a text query, results are ordered by relevance and carry a snippet;
/// without one, every sample inside the bounds is returned in no particular
/// order with an empty snippet.
pub fn search(conn: &Connection, options: &SearchOptions) -> Result<Vec<SearchHit>> {
    let (sql, params) = build_query(options);
    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(format!("search: {e}")))?;
    let hits = stmt
        .query_map(params_refs.as_slice(), |row| {
            Ok(SearchHit {
                sample: Sample::from_row(row)?,
                snippet: row.get(6)?,
            })
        })
        .map_err(|e| Error::database(format!("search: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(format!("search: {e}")))?;
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::samples::{insert_sample, rebuild_fts, set_missing_ends};
    use seekback_common::SampleId;
    use std::time::Duration;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn seed(conn: &Connection, id: &str, secs: u64, transcript: &str) {
        let mut s = Sample::new(SampleId::new(id));
        s.duration = Duration::from_secs(secs);
        s.transcript = transcript.to_string();
        insert_sample(conn, &s).unwrap();
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        let mut ids: Vec<&str> = hits.iter().map(|h| h.sample.id.as_str()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_build_query_omits_unset_bounds() {
        let (sql, params) = build_query(&SearchOptions::default());
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("MATCH"));
        assert!(params.is_empty());

        let mut opts = SearchOptions::default();
        opts.start_after = Some(ts("2024-01-01T00:00:00+00:00"));
        let (sql, params) = build_query(&opts);
        assert!(sql.contains("unixepoch(s.start) >= ?"));
        assert!(!sql.contains("<= ?"));
        assert!(!sql.contains(r#"s."end")"#));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_build_query_with_text() {
        let mut opts = SearchOptions::with_query("hello");
        opts.set_overlap(
            ts("2024-01-01T00:00:00+00:00"),
            ts("2024-01-02T00:00:00+00:00"),
        );
        let (sql, params) = build_query(&opts);
        assert!(sql.contains("samples_fts MATCH ?"));
        assert!(sql.contains("snippet(samples_fts, -1, '**', '**', '…', 64)"));
        assert!(sql.contains(r#"unixepoch(s."end") >= ?"#));
        assert!(sql.contains("unixepoch(s.start) <= ?"));
        assert!(sql.ends_with("ORDER BY samples_fts.rank"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_overlap_and_contained_setters() {
        let a = ts("2024-01-01T10:15:00+00:00");
        let b = ts("2024-01-01T10:35:00+00:00");

        let mut overlap = SearchOptions::default();
        overlap.set_overlap(a, b);
        assert_eq!(overlap.end_after, Some(a));
        assert_eq!(overlap.start_before, Some(b));
        assert!(overlap.start_after.is_none() && overlap.end_before.is_none());

        let mut contained = SearchOptions::default();
        contained.set_contained(a, b);
        assert_eq!(contained.start_after, Some(a));
        assert_eq!(contained.end_before, Some(b));
        assert!(contained.start_before.is_none() && contained.end_after.is_none());
    }

    #[test]
    fn test_overlap_vs_contained() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        // S1 [10:00, 10:30], S2 [10:20, 10:25]
        seed(&conn, "2024-01-01T10:00:00+00:00", 30 * 60, "");
        seed(&conn, "2024-01-01T10:20:00+00:00", 5 * 60, "");
        set_missing_ends(&conn).unwrap();

        let a = ts("2024-01-01T10:15:00+00:00");
        let b = ts("2024-01-01T10:35:00+00:00");

        let mut overlap = SearchOptions::default();
        overlap.set_overlap(a, b);
        let hits = search(&conn, &overlap).unwrap();
        assert_eq!(
            ids(&hits),
            vec!["2024-01-01T10:00:00+00:00", "2024-01-01T10:20:00+00:00"]
        );

        let mut contained = SearchOptions::default();
        contained.set_contained(a, b);
        let hits = search(&conn, &contained).unwrap();
        assert_eq!(ids(&hits), vec!["2024-01-01T10:20:00+00:00"]);
    }

    #[test]
    fn test_reversed_overlap_window_is_empty() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed(&conn, "2024-01-01T10:00:00+00:00", 30 * 60, "");
        set_missing_ends(&conn).unwrap();

        let mut opts = SearchOptions::default();
        opts.set_overlap(
            ts("2024-01-01T10:35:00+00:00"),
            ts("2024-01-01T10:15:00+00:00"),
        );
        // [10:00, 10:30] has end >= 10:35 false
        assert!(search(&conn, &opts).unwrap().is_empty());
    }

    #[test]
    fn test_bounds_compare_instants_across_offsets() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        // 10:00+09:00 is 01:00Z
        seed(&conn, "2024-01-01T10:00:00+09:00", 60, "");
        set_missing_ends(&conn).unwrap();

        let mut opts = SearchOptions::default();
        opts.start_after = Some(ts("2024-01-01T02:00:00+00:00"));
        assert!(search(&conn, &opts).unwrap().is_empty());

        opts.start_after = Some(ts("2024-01-01T00:30:00+00:00"));
        assert_eq!(search(&conn, &opts).unwrap().len(), 1);
    }

    #[test]
    fn test_no_query_returns_all_with_empty_snippet() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed(&conn, "a", 1, "one");
        seed(&conn, "b", 2, "two");

        let hits = search(&conn, &SearchOptions::default()).unwrap();
        assert_eq!(ids(&hits), vec!["a", "b"]);
        assert!(hits.iter().all(|h| h.snippet.is_empty()));
    }

    #[test]
    fn test_query_highlights_match() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed(&conn, "a", 1, "hello world");
        seed(&conn, "b", 1, "goodbye moon");
        rebuild_fts(&conn).unwrap();

        let hits = search(&conn, &SearchOptions::with_query("hello")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sample.id.as_str(), "a");
        assert!(hits[0].snippet.contains("**hello**"), "{}", hits[0].snippet);
        assert_eq!(hits[0].sample.transcript, "hello world");
    }

    #[test]
    fn test_long_transcript_snippet_is_elided() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let filler = vec!["filler"; 200].join(" ");
        seed(&conn, "a", 1, &format!("{filler} hello world {filler}"));
        rebuild_fts(&conn).unwrap();

        let hits = search(&conn, &SearchOptions::with_query("hello")).unwrap();
        assert_eq!(hits.len(), 1);
        let snippet = &hits[0].snippet;
        assert!(snippet.contains("**hello**"), "{snippet}");
        assert!(snippet.contains(SNIPPET_ELLIPSIS), "{snippet}");
    }

    #[test]
    fn test_query_ranked_by_relevance() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed(&conn, "weak", 1, &format!("hello {}", vec!["other"; 50].join(" ")));
        seed(&conn, "strong", 1, "hello hello hello");
        rebuild_fts(&conn).unwrap();

        let hits = search(&conn, &SearchOptions::with_query("hello")).unwrap();
        let order: Vec<&str> = hits.iter().map(|h| h.sample.id.as_str()).collect();
        assert_eq!(order, vec!["strong", "weak"]);
    }

    #[test]
    fn test_query_combined_with_bounds() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed(&conn, "2024-01-01T10:00:00+00:00", 60, "hello early");
        seed(&conn, "2024-01-02T10:00:00+00:00", 60, "hello late");
        set_missing_ends(&conn).unwrap();
        rebuild_fts(&conn).unwrap();

        let mut opts = SearchOptions::with_query("hello");
        opts.start_after = Some(ts("2024-01-02T00:00:00+00:00"));
        let hits = search(&conn, &opts).unwrap();
        assert_eq!(ids(&hits), vec!["2024-01-02T10:00:00+00:00"]);
    }

    #[test]
    fn test_rows_without_end_fail_end_bounds() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed(&conn, "2024-01-01T10:00:00+00:00", 60, "");

        let mut opts = SearchOptions::default();
        opts.end_after = Some(ts("2000-01-01T00:00:00+00:00"));
        assert!(search(&conn, &opts).unwrap().is_empty());
    }
}
