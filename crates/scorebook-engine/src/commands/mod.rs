//! Command orchestration layer.
//!
//! Each command coordinates core domain logic (sanitizer, planner,
//! projection) with the store (SQLite rows, blob files) for one caller
//! request.

pub mod scores;
pub mod sync;
