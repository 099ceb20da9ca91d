//! Snapshot upsert

use crate::errors::{from_rusqlite, Result};
use crate::snapshot::query::load_snapshot;
use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use scorebook_core::errors::{ExError, ExErrorKind};
use scorebook_core::model::SnapshotRow;

/// Store `snapshot_json` as the user's current snapshot, replacing any prior one
///
/// `saved_at` is stamped now. The row id of an existing snapshot survives
/// the replacement.
///
/// # Errors
///
/// Returns `Persistence` if the upsert fails.
pub fn persist_snapshot(
    conn: &Connection,
    user_id: i64,
    snapshot_json: &str,
    exported_at: &str,
) -> Result<SnapshotRow> {
    let saved_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    conn.execute(
        "INSERT INTO snapshots (user_id, snapshot, exported_at, saved_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
            snapshot = excluded.snapshot,
            exported_at = excluded.exported_at,
            saved_at = excluded.saved_at",
        rusqlite::params![user_id, snapshot_json, exported_at, saved_at],
    )
    .map_err(from_rusqlite)?;

    load_snapshot(conn, user_id)?.ok_or_else(|| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("persist_snapshot")
            .with_entity_id(user_id.to_string())
            .with_message("Snapshot row missing after upsert")
    })
}
