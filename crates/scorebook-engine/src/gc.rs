//! Orphan garbage collection
//!
//! Runs after a commit. Nothing here can fail the caller: a file that is
//! already gone counts as collected, anything else is a warning.

use scorebook_core::errors::{ExError, ExErrorKind};
use scorebook_core::log_op_warn;
use scorebook_core_types::schema::EVENT_GC_WARNING;
use scorebook_store::{FsBlobStore, RemoveOutcome};
use std::collections::BTreeSet;

/// What one collection pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcReport {
    pub removed: Vec<String>,
    /// Already absent from the blob store
    pub missing: Vec<String>,
    /// Could not be removed; each produced a warning
    pub failed: Vec<String>,
}

impl GcReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove every candidate file, best effort
pub fn collect(blobs: &FsBlobStore, candidates: &BTreeSet<String>) -> GcReport {
    let mut report = GcReport::default();

    for name in candidates {
        if name.trim().is_empty() {
            continue;
        }
        match blobs.remove(name) {
            Ok(RemoveOutcome::Removed) => report.removed.push(name.clone()),
            Ok(RemoveOutcome::Missing) => report.missing.push(name.clone()),
            Err(err) => {
                let warning = ExError::new(ExErrorKind::GarbageCollection)
                    .with_op("collect_orphans")
                    .with_entity_id(name.as_str())
                    .with_message("Failed to delete orphaned score image")
                    .with_source(err);
                log_op_warn!(
                    "collect_orphans",
                    EVENT_GC_WARNING,
                    filename = name.as_str(),
                    err_code = warning.code(),
                    message = %warning,
                );
                report.failed.push(name.clone());
            }
        }
    }

    if !report.removed.is_empty() || !report.missing.is_empty() {
        tracing::debug!(
            removed = report.removed.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            "Collected orphaned blobs"
        );
    }
    report
}
