//! Scorebook Store - persistence for scores, snapshots and page images
//!
//! Provides:
//! - SQLite connection setup and embedded, checksummed migrations
//! - A filesystem blob store for page images with atomic writes
//! - The score repository and transactional commit of a reconcile plan
//! - The one-row-per-user snapshot store

#![allow(clippy::result_large_err)]

pub mod blob;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod snapshot;

pub use blob::{FsBlobStore, RemoveOutcome};
pub use errors::Result;
pub use repo::{commit_plan, CommitResult, ScoreFields, ScoreRepo};
