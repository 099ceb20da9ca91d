//! Snapshot sync orchestration
//!
//! ## Pipeline (in order):
//! 1. Sanitize the raw document (shape errors stop here, nothing written)
//! 2. Materialize every page image into the blob store
//! 3. Open an immediate transaction, read the user's rows, plan
//! 4. Apply the plan and commit; on any failure the transaction rolls back
//!    and the blobs from step 2 are deleted
//! 5. Collect orphaned blobs (best effort)
//! 6. Persist the normalized snapshot document

#![allow(clippy::result_large_err)]

use crate::budget::WriteBudget;
use crate::gc;
use crate::materialize::{materialize, UploadedParts};
use crate::pending::PendingBlobs;
use rusqlite::{Connection, TransactionBehavior};
use scorebook_core::errors::ExError;
use scorebook_core::model::{ScoreSnapshot, Snapshot, SnapshotRow};
use scorebook_core::{prepare_score, project_score, reconcile, sanitize_snapshot};
use scorebook_core::{ScoreView, ScorebookError, SyncConfig};
use scorebook_core_types::SyncId;
use scorebook_store::errors::{from_rusqlite, Result};
use scorebook_store::snapshot::{load_snapshot as load_snapshot_row, persist_snapshot};
use scorebook_store::{commit_plan, FsBlobStore, ScoreRepo};
use serde::Serialize;
use serde_json::Value;

/// The stored snapshot of a user, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub snapshot: Snapshot,
    pub saved_at: String,
    pub exported_at: String,
}

/// Result of a successful sync
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub record: SnapshotRecord,
    /// The user's scores after the sync; `None` when the document had no `scores`
    pub scores: Option<Vec<ScoreView>>,
}

/// Counters from the score half of a sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSyncStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub created_files: usize,
    pub orphans_removed: usize,
}

/// Sync one user's snapshot
///
/// The caller is responsible for serializing syncs of the same user
/// (`SyncEngine` does this with `UserLocks`). `budget` bounds the time
/// spent materializing images and is checked before every page.
///
/// # Errors
///
/// - `InvalidInput` for a malformed document; nothing is written
/// - `InvalidImage`, `ImageTooLarge`, `Io`, `Timeout` while materializing;
///   blobs written so far are deleted
/// - `Persistence` when the plan cannot be applied; the transaction rolls
///   back and this attempt's blobs are deleted
#[allow(clippy::too_many_arguments)]
pub fn sync_snapshot(
    conn: &mut Connection,
    blobs: &FsBlobStore,
    config: &SyncConfig,
    user_id: i64,
    raw: &Value,
    parts: &UploadedParts,
    budget: &WriteBudget,
    sync_id: &SyncId,
) -> Result<SyncOutcome> {
    let snapshot = sanitize_snapshot(raw)?;

    let scores = match &snapshot.scores {
        Some(scores) => {
            let (views, stats) = sync_scores(conn, blobs, config, user_id, scores, parts, budget)?;
            tracing::info!(
                sync_id = sync_id.as_str(),
                user_id,
                created = stats.created,
                updated = stats.updated,
                deleted = stats.deleted,
                created_files = stats.created_files,
                orphans_removed = stats.orphans_removed,
                "Reconciled scores"
            );
            Some(views)
        }
        None => None,
    };

    let row = store_snapshot(conn, user_id, &snapshot)?;

    Ok(SyncOutcome {
        record: SnapshotRecord {
            snapshot,
            saved_at: row.saved_at,
            exported_at: row.exported_at,
        },
        scores,
    })
}

/// Materialize, plan and commit the score collection
fn sync_scores(
    conn: &mut Connection,
    blobs: &FsBlobStore,
    config: &SyncConfig,
    user_id: i64,
    scores: &[ScoreSnapshot],
    parts: &UploadedParts,
    budget: &WriteBudget,
) -> Result<(Vec<ScoreView>, ScoreSyncStats)> {
    blobs.ensure_root()?;

    let mut pending = PendingBlobs::new(blobs);
    let mut prepared = Vec::with_capacity(scores.len());

    for score in scores {
        let mut filenames = Vec::with_capacity(score.pages.len());
        for page in &score.pages {
            budget.check()?;
            let image = materialize(&page.image, parts, blobs, config.max_upload_bytes)?;
            pending.track(image.filename.as_str());
            filenames.push(image.filename);
        }
        prepared.push(prepare_score(score, filenames)?);
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;
    let existing = ScoreRepo::list_for_user(&tx, user_id)?;
    let plan = reconcile(prepared, &existing, pending.names());
    let result = commit_plan(&tx, user_id, &plan)?;
    tx.commit().map_err(from_rusqlite)?;

    let created_files = pending.names().len();
    pending.commit();

    let report = gc::collect(blobs, &plan.orphan_candidates);

    let stats = ScoreSyncStats {
        created: plan.create_count(),
        updated: plan.update_count(),
        deleted: result.deleted.len(),
        created_files,
        orphans_removed: report.removed.len(),
    };
    let views = result
        .saved
        .iter()
        .map(|record| project_score(record, &config.upload_route))
        .collect();
    Ok((views, stats))
}

fn store_snapshot(conn: &Connection, user_id: i64, snapshot: &Snapshot) -> Result<SnapshotRow> {
    let value = snapshot.to_value()?;
    let json = serde_json::to_string(&value).map_err(|e| {
        ExError::from(ScorebookError::Serialization {
            message: e.to_string(),
        })
    })?;
    persist_snapshot(conn, user_id, &json, &snapshot.exported_at)
}

/// The user's last synced snapshot, re-sanitized
///
/// A stored document that no longer parses as a snapshot is treated as
/// absent.
pub fn load_snapshot(conn: &Connection, user_id: i64) -> Result<Option<SnapshotRecord>> {
    let Some(row) = load_snapshot_row(conn, user_id)? else {
        return Ok(None);
    };

    let parsed = serde_json::from_str::<Value>(&row.snapshot)
        .ok()
        .and_then(|raw| sanitize_snapshot(&raw).ok());

    match parsed {
        Some(snapshot) => Ok(Some(SnapshotRecord {
            snapshot,
            saved_at: row.saved_at,
            exported_at: row.exported_at,
        })),
        None => {
            tracing::warn!(user_id, snapshot_id = row.id, "Stored snapshot is unreadable");
            Ok(None)
        }
    }
}
