//! Scorebook Engine - Orchestration layer
//!
//! Coordinates the domain logic in `scorebook-core` with the SQLite rows
//! and blob files in `scorebook-store`:
//! - image materialization with compensating cleanup
//! - the snapshot sync pipeline and snapshot loading
//! - orphan garbage collection
//! - per-user serialization of syncs

#![allow(clippy::result_large_err)]

pub mod budget;
pub mod commands;
pub mod gc;
pub mod locks;
pub mod materialize;
pub mod pending;

pub use budget::WriteBudget;
pub use commands::sync::{SnapshotRecord, SyncOutcome};
pub use gc::GcReport;
pub use locks::UserLocks;
pub use materialize::{MaterializedImage, UploadedPart, UploadedParts};

use rusqlite::Connection;
use scorebook_core::{log_op_end, log_op_error, log_op_start, ScoreView, SyncConfig};
use scorebook_core_types::SyncId;
use scorebook_store::errors::Result;
use scorebook_store::migrations::apply_migrations;
use scorebook_store::{db, FsBlobStore};
use serde_json::Value;
use std::time::Instant;

/// Entry point for callers that own a configuration
///
/// Connections are passed in per call so that each request (or thread) can
/// use its own; the engine only holds what must be shared between them.
#[derive(Debug)]
pub struct SyncEngine {
    config: SyncConfig,
    blobs: FsBlobStore,
    locks: UserLocks,
}

impl SyncEngine {
    pub fn new(config: SyncConfig) -> Self {
        let blobs = FsBlobStore::new(config.upload_dir.clone());
        Self {
            config,
            blobs,
            locks: UserLocks::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn blobs(&self) -> &FsBlobStore {
        &self.blobs
    }

    /// Open the configured database, configured and migrated
    pub fn connect(&self) -> Result<Connection> {
        let mut conn = db::open(&self.config.database_path)?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    }

    /// Sync a raw snapshot document for `user_id`
    ///
    /// # Errors
    ///
    /// See [`commands::sync::sync_snapshot`]; additionally `Concurrency`
    /// if the user's lock is poisoned.
    pub fn sync_snapshot(
        &self,
        conn: &mut Connection,
        user_id: i64,
        raw: &Value,
        parts: &UploadedParts,
    ) -> Result<SyncOutcome> {
        let sync_id = SyncId::new();
        let start = Instant::now();
        log_op_start!("sync_snapshot", sync_id = sync_id.as_str(), user_id = user_id);

        let result = self.locks.with_user(user_id, || {
            let budget = WriteBudget::start(self.config.write_budget());
            commands::sync::sync_snapshot(
                conn,
                &self.blobs,
                &self.config,
                user_id,
                raw,
                parts,
                &budget,
                &sync_id,
            )
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "sync_snapshot",
                    duration_ms = duration_ms,
                    sync_id = sync_id.as_str(),
                    user_id = user_id,
                    score_count = outcome.scores.as_ref().map_or(0, Vec::len),
                );
            }
            Err(err) => {
                log_op_error!(
                    "sync_snapshot",
                    err.clone(),
                    duration_ms = duration_ms,
                    sync_id = sync_id.as_str(),
                    user_id = user_id,
                );
            }
        }
        result
    }

    /// The user's last synced snapshot, if any
    pub fn load_snapshot(&self, conn: &Connection, user_id: i64) -> Result<Option<SnapshotRecord>> {
        let start = Instant::now();
        log_op_start!("load_snapshot", user_id = user_id);

        let result = commands::sync::load_snapshot(conn, user_id);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(record) => {
                log_op_end!(
                    "load_snapshot",
                    duration_ms = duration_ms,
                    user_id = user_id,
                    found = record.is_some(),
                );
            }
            Err(err) => {
                log_op_error!(
                    "load_snapshot",
                    err.clone(),
                    duration_ms = duration_ms,
                    user_id = user_id,
                );
            }
        }
        result
    }

    pub fn list_scores(&self, conn: &Connection, user_id: i64) -> Result<Vec<ScoreView>> {
        commands::scores::list_scores(conn, &self.config, user_id)
    }

    /// Delete one score outside a sync, then collect its files
    pub fn delete_score(&self, conn: &mut Connection, user_id: i64, score_id: i64) -> Result<GcReport> {
        let start = Instant::now();
        log_op_start!("delete_score", user_id = user_id, score_id = score_id);

        let result = self.locks.with_user(user_id, || {
            commands::scores::delete_score(conn, &self.blobs, user_id, score_id)
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    "delete_score",
                    duration_ms = duration_ms,
                    user_id = user_id,
                    score_id = score_id,
                    orphan_count = report.removed.len() + report.missing.len(),
                );
            }
            Err(err) => {
                log_op_error!(
                    "delete_score",
                    err.clone(),
                    duration_ms = duration_ms,
                    user_id = user_id,
                    score_id = score_id,
                );
            }
        }
        result
    }
}
