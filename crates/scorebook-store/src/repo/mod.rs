//! Score persistence
//!
//! `ScoreRepo` holds the per-row statements; `commit_plan` applies a whole
//! reconcile plan inside a caller-owned transaction.

mod commit;
mod score_repo;

pub use commit::{commit_plan, CommitResult};
pub use score_repo::{ScoreFields, ScoreRepo};
