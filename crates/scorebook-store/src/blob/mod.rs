//! Filesystem blob store for score page images
//!
//! Provides:
//! - Atomic writes (temp file then rename)
//! - Flat, validated names (no separators, no `..`)
//! - Removal that reports an already-missing file instead of failing

mod atomic;
mod fs_store;

pub use fs_store::{FsBlobStore, RemoveOutcome};
