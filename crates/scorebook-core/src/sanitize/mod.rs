//! Snapshot sanitizer
//!
//! Strict on document shape, permissive per item: a malformed document is
//! rejected with a typed error, while unusable scores, pages and vocabulary
//! entries are dropped. The output is canonical, so sanitizing the JSON form
//! of a sanitized snapshot yields the same snapshot.

pub mod coerce;
pub mod scores;
pub mod study;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::errors::{Result, ScorebookError};
use crate::model::{Snapshot, SNAPSHOT_FORMAT};

/// Version assumed when a document carries none
pub const DEFAULT_VERSION: i64 = 1;

/// Validate and normalize a raw snapshot document
///
/// # Errors
///
/// - `SnapshotNotObject` if the root is not a JSON object
/// - `FormatMismatch` if `format` is not the snapshot marker
/// - `InvalidVersion` if `version` is present but not numeric
/// - `ScoresNotList` if `scores` is present but not an array
pub fn sanitize_snapshot(raw: &Value) -> Result<Snapshot> {
    let root = raw.as_object().ok_or(ScorebookError::SnapshotNotObject)?;

    match root.get("format") {
        Some(Value::String(format)) if format == SNAPSHOT_FORMAT => {}
        other => {
            return Err(ScorebookError::FormatMismatch {
                expected: SNAPSHOT_FORMAT.to_string(),
                found: other.map(Value::to_string).unwrap_or_else(|| "nothing".to_string()),
            })
        }
    }

    let version = match root.get("version") {
        None | Some(Value::Null) => serde_json::Number::from(DEFAULT_VERSION),
        Some(value) => coerce::number_value(Some(value)).ok_or_else(|| {
            ScorebookError::InvalidVersion {
                found: value.to_string(),
            }
        })?,
    };

    let scores = match root.get("scores") {
        None => None,
        Some(Value::Array(entries)) => Some(scores::sanitize_scores(entries)),
        Some(_) => return Err(ScorebookError::ScoresNotList),
    };

    let exported_at = root
        .get("exportedAt")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    Ok(Snapshot {
        format: SNAPSHOT_FORMAT.to_string(),
        version,
        exported_at,
        pages: study::sanitize_vocab_pages(root.get("pages")),
        api_config: study::sanitize_api_config(root.get("apiConfig")),
        exam_history: study::sanitize_exam_history(root.get("examHistory")),
        pdf: study::sanitize_pdf(root.get("pdf")),
        scores,
    })
}
