//! Sample database queries.
//!
//! Row-level operations used by the reconciler and the API write path. Every
//! write is a single statement; nothing here opens a transaction spanning
//! more than one row. Errors are prefixed with the operation that failed.

use chrono::{DateTime, FixedOffset};
use rusqlite::{Connection, OptionalExtension};
use seekback_common::{Error, Result, SampleId};
use std::time::Duration;

use crate::models::{
    duration_from_sql, duration_to_sql, end_of, parse_timestamp, to_sql_timestamp, Sample,
};

const COLS: &str = r#"id, start, duration, "end", summary, transcript"#;

/// Look up a sample by ID.
pub fn get_sample(conn: &Connection, id: &SampleId) -> Result<Option<Sample>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM samples WHERE id = ?1"),
        [id.as_str()],
        Sample::from_row,
    )
    .optional()
    .map_err(|e| Error::database(format!("select: {e}")))
}

/// Insert a new sample.
///
/// `end` is left NULL; [`set_missing_ends`] fills it in.
pub fn insert_sample(conn: &Connection, sample: &Sample) -> Result<()> {
    conn.execute(
        "INSERT INTO samples (id, start, duration, summary, transcript)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            sample.id.as_str(),
            to_sql_timestamp(&sample.start),
            duration_to_sql(sample.duration),
            &sample.summary,
            &sample.transcript,
        ],
    )
    .map_err(|e| Error::database(format!("insert: {e}")))?;
    Ok(())
}

/// Overwrite the filesystem-derived fields of an existing sample.
///
/// `summary` is untouched. If `start` or `duration` change, `end` is reset
/// to NULL so the next backfill recomputes it.
pub fn update_sample_from_scan(
    conn: &Connection,
    id: &SampleId,
    start: &DateTime<FixedOffset>,
    duration: Duration,
    transcript: &str,
) -> Result<()> {
    conn.execute(
        r#"UPDATE samples SET
            "end" = CASE WHEN start = ?2 AND duration = ?3 THEN "end" ELSE NULL END,
            start = ?2,
            duration = ?3,
            transcript = ?4
         WHERE id = ?1"#,
        rusqlite::params![
            id.as_str(),
            to_sql_timestamp(start),
            duration_to_sql(duration),
            transcript,
        ],
    )
    .map_err(|e| Error::database(format!("update: {e}")))?;
    Ok(())
}

/// Set the summary of a sample.
///
/// Returns `false` if no such sample exists.
pub fn set_summary(conn: &Connection, id: &SampleId, summary: &str) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE samples SET summary = ?2 WHERE id = ?1",
            rusqlite::params![id.as_str(), summary],
        )
        .map_err(|e| Error::database(format!("update: {e}")))?;
    Ok(changed > 0)
}

/// Delete a sample row.
pub fn delete_sample(conn: &Connection, id: &SampleId) -> Result<()> {
    conn.execute("DELETE FROM samples WHERE id = ?1", [id.as_str()])
        .map_err(|e| Error::database(format!("delete: {e}")))?;
    Ok(())
}

/// All persisted sample IDs.
pub fn list_ids(conn: &Connection) -> Result<Vec<SampleId>> {
    let mut stmt = conn
        .prepare("SELECT id FROM samples")
        .map_err(|e| Error::database(format!("select: {e}")))?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0).map(SampleId::from))
        .map_err(|e| Error::database(format!("select: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(format!("select: {e}")))?;
    Ok(ids)
}

/// All persisted samples, oldest first.
pub fn list_samples(conn: &Connection) -> Result<Vec<Sample>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLS} FROM samples ORDER BY unixepoch(start), id"
        ))
        .map_err(|e| Error::database(format!("select: {e}")))?;
    let samples = stmt
        .query_map([], Sample::from_row)
        .map_err(|e| Error::database(format!("select: {e}")))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(format!("select: {e}")))?;
    Ok(samples)
}

/// Rebuild the full-text index from the current table contents.
pub fn rebuild_fts(conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO samples_fts(samples_fts) VALUES ('rebuild')", [])
        .map_err(|e| Error::database(format!("fts rebuild: {e}")))?;
    Ok(())
}

/// Fill in `end = start + duration` on every row where it is NULL.
///
/// Returns the number of rows repaired.
pub fn set_missing_ends(conn: &Connection) -> Result<usize> {
    let pending: Vec<(String, DateTime<FixedOffset>, Duration)> = {
        let mut stmt = conn
            .prepare(r#"SELECT id, start, duration FROM samples WHERE "end" IS NULL"#)
            .map_err(|e| Error::database(format!("set ends: {e}")))?;
        let rows = stmt
            .query_map([], |row| {
                let start: String = row.get(1)?;
                Ok((
                    row.get(0)?,
                    parse_timestamp(1, &start)?,
                    duration_from_sql(row.get(2)?),
                ))
            })
            .map_err(|e| Error::database(format!("set ends: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::database(format!("set ends: {e}")))?;
        rows
    };

    for (id, start, duration) in &pending {
        conn.execute(
            r#"UPDATE samples SET "end" = ?2 WHERE id = ?1"#,
            rusqlite::params![id, to_sql_timestamp(&end_of(*start, *duration))],
        )
        .map_err(|e| Error::database(format!("set ends: {e}")))?;
    }

    Ok(pending.len())
}
