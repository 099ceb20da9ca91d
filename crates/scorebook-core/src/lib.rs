//! Scorebook Core - snapshot domain logic
//!
//! This crate holds everything about snapshot synchronization that needs
//! neither a database nor a filesystem:
//! - Snapshot data model and persisted row shapes
//! - The sanitizer (raw JSON to canonical `Snapshot`)
//! - The reconciliation planner (create/update/delete plan, orphan files)
//! - Projection of persisted rows into public score views
//! - Error and logging facilities shared by the other crates
//! - Layered configuration

#![allow(clippy::result_large_err)]

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod plan;
pub mod projection;
pub mod sanitize;

// The logging macros resolve schema constants through this path.
#[doc(hidden)]
pub use scorebook_core_types;

pub use config::SyncConfig;
pub use errors::{ExError, ExErrorKind, Result, ScorebookError};
pub use model::{ScoreRecord, ScoreSnapshot, Snapshot};
pub use plan::{prepare_score, reconcile, PlannedWrite, PreparedScore, ReconcilePlan};
pub use projection::{project_score, ScoreView};
pub use sanitize::sanitize_snapshot;
