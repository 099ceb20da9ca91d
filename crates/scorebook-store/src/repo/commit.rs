//! Apply a reconcile plan inside one transaction

use crate::errors::{score_vanished, Result};
use crate::repo::score_repo::{ScoreFields, ScoreRepo};
use rusqlite::Transaction;
use scorebook_core::model::ScoreRecord;
use scorebook_core::{PlannedWrite, ReconcilePlan};

/// Rows produced by a committed plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitResult {
    /// Created and updated rows, in plan order
    pub saved: Vec<ScoreRecord>,
    pub deleted: Vec<i64>,
}

/// Execute every write and delete of `plan` against `tx`
///
/// Does not commit; the caller decides once blob bookkeeping is settled.
/// On error the transaction is left for the caller to drop, which rolls
/// every statement back.
///
/// # Errors
///
/// Returns `Persistence` if a statement fails or an updated row vanished.
pub fn commit_plan(tx: &Transaction<'_>, user_id: i64, plan: &ReconcilePlan) -> Result<CommitResult> {
    let mut result = CommitResult::default();

    for write in &plan.writes {
        let fields = ScoreFields::from(write.score());
        let row = match write {
            PlannedWrite::Create(_) => ScoreRepo::insert(tx, user_id, fields)?,
            PlannedWrite::Update { id, .. } => {
                ScoreRepo::update(tx, user_id, *id, fields)?.ok_or_else(|| score_vanished(*id))?
            }
        };
        result.saved.push(row);
    }

    for id in &plan.deletes {
        // A row already gone is fine; the snapshot no longer wants it either way
        if ScoreRepo::delete(tx, user_id, *id)? {
            result.deleted.push(*id);
        }
    }

    tracing::debug!(
        user_id,
        saved = result.saved.len(),
        deleted = result.deleted.len(),
        "Applied reconcile plan"
    );
    Ok(result)
}
