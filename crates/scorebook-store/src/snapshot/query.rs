//! Snapshot lookup

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension};
use scorebook_core::model::SnapshotRow;

/// The user's stored snapshot row, if any
pub fn load_snapshot(conn: &Connection, user_id: i64) -> Result<Option<SnapshotRow>> {
    conn.query_row(
        "SELECT id, user_id, snapshot, exported_at, saved_at FROM snapshots WHERE user_id = ?1",
        [user_id],
        |row| {
            Ok(SnapshotRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                snapshot: row.get(2)?,
                exported_at: row.get(3)?,
                saved_at: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(from_rusqlite)
}
