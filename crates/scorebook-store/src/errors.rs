//! Error helpers for scorebook-store
//!
//! Wraps scorebook-core ExError with store-specific constructors

use scorebook_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create a missing blob error
pub fn blob_missing(name: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("blob_read")
        .with_entity_id(name)
        .with_message(format!("Blob not found: {}", name))
}

/// Create an invalid blob name error
pub fn invalid_blob_name(name: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("blob_path")
        .with_entity_id(name)
        .with_message("Blob names must be a single non-empty path component")
}

/// Create the error raised when an update targets a row that no longer exists
pub fn score_vanished(score_id: i64) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("update_score")
        .with_entity_id(score_id.to_string())
        .with_message("Failed to update score: row no longer exists")
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
