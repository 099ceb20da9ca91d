//! Correlation identifiers
//!
//! A sync attempt touches two independent resources (SQLite and the blob
//! directory). Every log line emitted on its behalf carries the same
//! `SyncId` so a partially compensated attempt can be reconstructed from logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single sync attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncId(String);

impl SyncId {
    /// Generate a new SyncId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an id received from elsewhere (e.g. a request header)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for SyncId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SyncId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
