//! Direct score operations outside a full snapshot sync

#![allow(clippy::result_large_err)]

use crate::gc::{self, GcReport};
use rusqlite::{Connection, TransactionBehavior};
use scorebook_core::errors::{ExError, ExErrorKind};
use scorebook_core::{project_score, ScoreView, SyncConfig};
use scorebook_store::errors::{from_rusqlite, Result};
use scorebook_store::{FsBlobStore, ScoreRepo};

/// Every score of the user, newest first, in public form
pub fn list_scores(conn: &Connection, config: &SyncConfig, user_id: i64) -> Result<Vec<ScoreView>> {
    let rows = ScoreRepo::list_for_user(conn, user_id)?;
    Ok(rows
        .iter()
        .map(|row| project_score(row, &config.upload_route))
        .collect())
}

/// Delete one score and then its image files
///
/// # Errors
///
/// Returns `NotFound` when the user has no score with that id.
pub fn delete_score(
    conn: &mut Connection,
    blobs: &FsBlobStore,
    user_id: i64,
    score_id: i64,
) -> Result<GcReport> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;
    let row = ScoreRepo::get_for_user(&tx, user_id, score_id)?.ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("delete_score")
            .with_entity_id(score_id.to_string())
            .with_message("Score not found")
    })?;
    ScoreRepo::delete(&tx, user_id, score_id)?;
    tx.commit().map_err(from_rusqlite)?;

    Ok(gc::collect(blobs, &row.file_set()))
}
