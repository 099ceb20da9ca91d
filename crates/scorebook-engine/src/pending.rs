//! Compensating cleanup for blobs written during one sync attempt

use scorebook_core::log_op_warn;
use scorebook_core_types::schema::EVENT_ROLLBACK;
use scorebook_store::{FsBlobStore, RemoveOutcome};
use std::collections::BTreeSet;

/// Blobs written by a sync that has not committed yet
///
/// Dropping the guard without calling `commit` deletes every tracked file,
/// so any early return after a write leaves the blob store as it was.
pub struct PendingBlobs<'a> {
    blobs: &'a FsBlobStore,
    names: BTreeSet<String>,
    committed: bool,
}

impl<'a> PendingBlobs<'a> {
    pub fn new(blobs: &'a FsBlobStore) -> Self {
        Self {
            blobs,
            names: BTreeSet::new(),
            committed: false,
        }
    }

    pub fn track(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// The relational state now references the tracked files; keep them
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingBlobs<'_> {
    fn drop(&mut self) {
        if self.committed || self.names.is_empty() {
            return;
        }

        let mut removed = 0usize;
        for name in &self.names {
            match self.blobs.remove(name) {
                Ok(RemoveOutcome::Removed) => removed += 1,
                Ok(RemoveOutcome::Missing) => {}
                Err(err) => {
                    log_op_warn!(
                        "rollback_blobs",
                        EVENT_ROLLBACK,
                        filename = name.as_str(),
                        err_code = err.code(),
                        message = %err,
                    );
                }
            }
        }

        log_op_warn!(
            "rollback_blobs",
            EVENT_ROLLBACK,
            created_files = self.names.len(),
            removed = removed,
        );
    }
}
