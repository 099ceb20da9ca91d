//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_SYNC_ID: &str = "sync_id";

// Entity identifiers
pub const FIELD_USER_ID: &str = "user_id";
pub const FIELD_SCORE_ID: &str = "score_id";
pub const FIELD_FILENAME: &str = "filename";

// Collection sizes
pub const FIELD_SCORE_COUNT: &str = "score_count";
pub const FIELD_CREATED_FILES: &str = "created_files";
pub const FIELD_ORPHAN_COUNT: &str = "orphan_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ROLLBACK: &str = "rollback";
pub const EVENT_GC_WARNING: &str = "gc_warning";
