#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{document, score, setup};
use scorebook_core::logging_facility::test_capture::init_test_capture;
use scorebook_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_ROLLBACK, EVENT_START};
use scorebook_engine::UploadedParts;
use serde_json::json;

#[test]
fn test_sync_logs_start_and_end_with_sync_id() {
    let capture = init_test_capture();
    let mut h = setup();

    h.engine
        .sync_snapshot(&mut h.conn, 9101, &document(Some(json!([score(None, "Logged", 1)]))), &UploadedParts::new())
        .unwrap();

    let events = capture.events_with("user_id", "9101");
    let start = events
        .iter()
        .find(|e| e.op.as_deref() == Some("sync_snapshot") && e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    let end = events
        .iter()
        .find(|e| e.op.as_deref() == Some("sync_snapshot") && e.event.as_deref() == Some(EVENT_END))
        .expect("end event");

    assert!(start.field("sync_id").is_some());
    assert_eq!(start.field("sync_id"), end.field("sync_id"));
    assert_eq!(end.field("score_count"), Some("1"));
    assert!(end.field("duration_ms").is_some());
}

#[test]
fn test_failed_sync_logs_error_and_rollback() {
    let capture = init_test_capture();
    let mut h = setup();

    let bad = json!({"title": "Bad", "pages": [{"image": {"encoding": "base64", "data": "@@@@"}}]});
    h.engine
        .sync_snapshot(&mut h.conn, 9102, &document(Some(json!([score(None, "Good", 1), bad]))), &UploadedParts::new())
        .unwrap_err();

    let errors = capture.events_with("user_id", "9102");
    let end_error = errors
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("end_error event");
    assert_eq!(end_error.field("err_code"), Some("ERR_INVALID_IMAGE"));

    let rollbacks = capture.count_events(|e| {
        e.op.as_deref() == Some("rollback_blobs")
            && e.event.as_deref() == Some(EVENT_ROLLBACK)
            && e.field("removed") == Some("1")
    });
    assert!(rollbacks >= 1);
}
