use thiserror::Error;

/// Result type alias using ScorebookError
pub type Result<T> = std::result::Result<T, ScorebookError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code that callers (HTTP layers, the CLI,
/// tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Snapshot shape
    InvalidInput,

    // Image materialization
    InvalidImage,
    ImageTooLarge,

    // Lookup
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Timeout,
    Concurrency,
    Config,

    /// Post-commit cleanup failure; only ever logged
    GarbageCollection,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidImage => "ERR_INVALID_IMAGE",
            ExErrorKind::ImageTooLarge => "ERR_IMAGE_TOO_LARGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::GarbageCollection => "WARN_GARBAGE_COLLECTION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus
/// context (`op`, `entity_id`, `message`) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (score id, filename, user id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Typed errors raised by the snapshot domain logic
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorebookError {
    // ===== Snapshot shape (ValidationError) =====
    /// Root of the document is not a JSON object
    #[error("Snapshot must be a JSON object")]
    SnapshotNotObject,

    /// `format` does not carry the expected marker
    #[error("Snapshot format must be {expected}, got {found}")]
    FormatMismatch { expected: String, found: String },

    /// `version` is not a finite number
    #[error("Snapshot version must be a number, got {found}")]
    InvalidVersion { found: String },

    /// `scores` is present but not an array
    #[error("Snapshot scores must be an array")]
    ScoresNotList,

    // ===== Image materialization =====
    /// Decoded image is empty or could not be decoded
    #[error("Score image data is empty or invalid: {reason}")]
    InvalidImage { reason: String },

    /// Decoded image exceeds the configured maximum
    #[error("Score image too large: each page must not exceed {max_mb}MB ({size} bytes > {max} bytes)")]
    ImageTooLarge { size: u64, max: u64, max_mb: u64 },

    // ===== Configuration =====
    /// Configuration could not be loaded or is out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ===== Generic =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ScorebookError {
    /// Build an ImageTooLarge error with the rounded megabyte figure
    pub fn image_too_large(size: u64, max: u64) -> Self {
        let max_mb = ((max as f64) / 1024.0 / 1024.0).round() as u64;
        ScorebookError::ImageTooLarge { size, max, max_mb }
    }
}

/// Conversion from ScorebookError to ExError
impl From<ScorebookError> for ExError {
    fn from(err: ScorebookError) -> Self {
        let message = err.to_string();
        match err {
            ScorebookError::SnapshotNotObject
            | ScorebookError::FormatMismatch { .. }
            | ScorebookError::InvalidVersion { .. }
            | ScorebookError::ScoresNotList => ExError::new(ExErrorKind::InvalidInput)
                .with_op("sanitize_snapshot")
                .with_message(message),
            ScorebookError::InvalidImage { .. } => ExError::new(ExErrorKind::InvalidImage)
                .with_op("materialize_image")
                .with_message(message),
            ScorebookError::ImageTooLarge { .. } => ExError::new(ExErrorKind::ImageTooLarge)
                .with_op("materialize_image")
                .with_message(message),
            ScorebookError::InvalidConfig { .. } => ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(message),
            ScorebookError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_op_and_entity() {
        let err = ExError::new(ExErrorKind::Persistence)
            .with_op("commit_plan")
            .with_entity_id("42")
            .with_message("score vanished");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_PERSISTENCE]"));
        assert!(text.contains("commit_plan"));
        assert!(text.contains("score vanished"));
        assert!(text.contains("42"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Persistence).with_source(inner);
        assert_eq!(outer.source_error().unwrap().kind(), ExErrorKind::Io);
        assert!(std::error::Error::source(&outer).is_some());
    }

    #[test]
    fn test_image_too_large_rounds_megabytes() {
        let err = ScorebookError::image_too_large(30 * 1024 * 1024, 20 * 1024 * 1024);
        assert!(err.to_string().contains("20MB"));

        let err = ScorebookError::image_too_large(10, 1536 * 1024);
        // 1.5 MiB rounds up
        assert!(err.to_string().contains("2MB"));
    }
}
