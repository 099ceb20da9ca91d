//! Canonical logging macros
//!
//! Field names and event values come from `scorebook_core_types::schema`.
//! The macros resolve that crate through `$crate`, so callers only need
//! `scorebook-core` and `tracing` in their dependencies.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use scorebook_core::log_op_start;
/// log_op_start!("sync_snapshot");
/// log_op_start!("sync_snapshot", user_id = "u1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorebook_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorebook_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use scorebook_core::log_op_end;
/// log_op_end!("sync_snapshot", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorebook_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorebook_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` is converted into `ExError`, so both `ScorebookError` and
/// `ExError` values are accepted.
///
/// # Example
///
/// ```
/// # use scorebook_core::{log_op_error, errors::ScorebookError};
/// let err = ScorebookError::ScoresNotList;
/// log_op_error!("sanitize_snapshot", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::scorebook_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            message = %ex_err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::scorebook_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            message = %ex_err,
            $($field)*
        );
    }};
}

/// Log a non-fatal condition inside an operation (rollback, cleanup failure)
///
/// # Example
///
/// ```
/// # use scorebook_core::log_op_warn;
/// log_op_warn!("collect_orphans", "gc_warning", filename = "a.png");
/// ```
#[macro_export]
macro_rules! log_op_warn {
    ($op:expr, $event:expr) => {
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $event,
        );
    };
    ($op:expr, $event:expr, $($field:tt)*) => {
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($field)*
        );
    };
}
