//! Score reconciliation planning
//!
//! Pure functions: given the incoming scores (with their page images already
//! materialized) and the rows currently persisted for the user, decide which
//! rows to create, update and delete, and which blobs stop being referenced.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{Result, ScorebookError};
use crate::model::{PersistedPage, ScorePageSnapshot, ScoreRecord, ScoreSnapshot};

/// Page meta keys that never pass through into a persisted page
const RESERVED_PAGE_KEYS: [&str; 5] = ["filename", "image", "order", "width", "height"];

/// Incoming score ready to be written: config serialized, cover resolved
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedScore {
    /// Id claimed by the client, if any; only honored when it matches a row
    pub claimed_id: Option<i64>,
    pub title: String,
    pub composer: String,
    pub description: String,
    pub config_json: String,
    pub cover_filename: String,
    /// Blobs written for this score during the current sync
    pub filenames: Vec<String>,
}

/// Build the persisted form of one page around its freshly written blob
pub fn persisted_page(page: &ScorePageSnapshot, filename: &str) -> PersistedPage {
    let extra = page
        .meta
        .iter()
        .filter(|(key, _)| !RESERVED_PAGE_KEYS.contains(&key.as_str()))
        .map(|(key, val)| (key.clone(), val.clone()))
        .collect();

    PersistedPage {
        filename: filename.to_string(),
        order: page.order.clone(),
        width: page.width.clone(),
        height: page.height.clone(),
        extra,
    }
}

/// Combine a sanitized score with the filenames its pages were written to
///
/// `filenames[i]` belongs to `score.pages[i]`. The stored config is the
/// client config with `pages` replaced by the persisted page list.
///
/// # Errors
///
/// Returns `Serialization` if the merged config cannot be encoded.
pub fn prepare_score(score: &ScoreSnapshot, filenames: Vec<String>) -> Result<PreparedScore> {
    debug_assert_eq!(score.pages.len(), filenames.len());

    let pages: Vec<PersistedPage> = score
        .pages
        .iter()
        .zip(&filenames)
        .map(|(page, filename)| persisted_page(page, filename))
        .collect();

    let cover_filename = pages
        .get(score.resolved_cover_index())
        .or_else(|| pages.first())
        .map(|page| page.filename.clone())
        .unwrap_or_default();

    let mut config: Map<String, Value> = score.config.clone();
    let pages_value = serde_json::to_value(&pages).map_err(|e| ScorebookError::Serialization {
        message: e.to_string(),
    })?;
    config.insert("pages".to_string(), pages_value);

    let config_json =
        serde_json::to_string(&config).map_err(|e| ScorebookError::Serialization {
            message: e.to_string(),
        })?;

    Ok(PreparedScore {
        claimed_id: score.id,
        title: score.title.clone(),
        composer: score.composer.clone(),
        description: score.description.clone(),
        config_json,
        cover_filename,
        filenames,
    })
}

/// One relational write in a plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedWrite {
    Create(PreparedScore),
    Update { id: i64, score: PreparedScore },
}

impl PlannedWrite {
    pub fn score(&self) -> &PreparedScore {
        match self {
            PlannedWrite::Create(score) => score,
            PlannedWrite::Update { score, .. } => score,
        }
    }
}

/// Outcome of reconciliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Creations and updates, in the order the client listed the scores
    pub writes: Vec<PlannedWrite>,
    /// Rows to remove because the snapshot no longer lists them
    pub deletes: Vec<i64>,
    /// Blobs to remove once the plan has been committed
    pub orphan_candidates: BTreeSet<String>,
}

impl ReconcilePlan {
    pub fn create_count(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, PlannedWrite::Create(_)))
            .count()
    }

    pub fn update_count(&self) -> usize {
        self.writes.len() - self.create_count()
    }
}

/// Diff incoming scores against the persisted rows of one user
///
/// - an incoming score whose `claimed_id` names an existing row updates that
///   row; the row's previous files become orphan candidates
/// - any other incoming score is a creation, including a second score
///   claiming an id that an earlier one already took
/// - every existing row not updated is deleted along with its files
///
/// Files in `created` are never orphan candidates.
pub fn reconcile(
    incoming: Vec<PreparedScore>,
    existing: &[ScoreRecord],
    created: &BTreeSet<String>,
) -> ReconcilePlan {
    let existing_by_id: BTreeMap<i64, &ScoreRecord> =
        existing.iter().map(|row| (row.id, row)).collect();

    let mut plan = ReconcilePlan::default();
    let mut matched: BTreeSet<i64> = BTreeSet::new();

    let release = |row: &ScoreRecord, candidates: &mut BTreeSet<String>| {
        candidates.extend(
            row.file_set()
                .into_iter()
                .filter(|name| !created.contains(name)),
        );
    };

    for score in incoming {
        let target = score
            .claimed_id
            .filter(|id| !matched.contains(id))
            .and_then(|id| existing_by_id.get(&id).copied());

        match target {
            Some(row) => {
                matched.insert(row.id);
                release(row, &mut plan.orphan_candidates);
                plan.writes.push(PlannedWrite::Update { id: row.id, score });
            }
            None => plan.writes.push(PlannedWrite::Create(score)),
        }
    }

    for row in existing {
        if !matched.contains(&row.id) {
            plan.deletes.push(row.id);
            release(row, &mut plan.orphan_candidates);
        }
    }

    plan
}
