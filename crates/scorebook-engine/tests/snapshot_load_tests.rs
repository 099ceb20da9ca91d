#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{document, score, setup};
use scorebook_engine::UploadedParts;
use serde_json::json;

#[test]
fn test_load_without_sync_is_none() {
    let h = setup();
    assert_eq!(h.engine.load_snapshot(&h.conn, 1).unwrap(), None);
}

#[test]
fn test_load_returns_normalized_document() {
    let mut h = setup();
    let mut doc = document(Some(json!([score(None, "Ballade", 1)])));
    doc["pages"] = json!([{"page": "3", "items": [{"jp": "猫", "pos": "名", "cn": "猫"}]}]);
    doc["unknownTopLevel"] = json!(true);

    let outcome = h
        .engine
        .sync_snapshot(&mut h.conn, 1, &doc, &UploadedParts::new())
        .unwrap();
    let loaded = h.engine.load_snapshot(&h.conn, 1).unwrap().unwrap();

    assert_eq!(loaded.snapshot, outcome.record.snapshot);
    assert_eq!(loaded.saved_at, outcome.record.saved_at);
    assert_eq!(loaded.snapshot.pages[0].page, serde_json::Number::from(3));
    assert_eq!(loaded.snapshot.pages[0].items[0].tag, "普通");

    let value = serde_json::to_value(&loaded).unwrap();
    assert!(value.get("savedAt").is_some());
    assert!(value["snapshot"].get("unknownTopLevel").is_none());
    assert_eq!(value["snapshot"]["scores"][0]["title"], "Ballade");
}

#[test]
fn test_resync_replaces_snapshot() {
    let mut h = setup();
    h.engine
        .sync_snapshot(&mut h.conn, 1, &document(None), &UploadedParts::new())
        .unwrap();

    let mut doc = document(None);
    doc["exportedAt"] = json!("2025-01-01T00:00:00.000Z");
    h.engine
        .sync_snapshot(&mut h.conn, 1, &doc, &UploadedParts::new())
        .unwrap();

    let loaded = h.engine.load_snapshot(&h.conn, 1).unwrap().unwrap();
    assert_eq!(loaded.exported_at, "2025-01-01T00:00:00.000Z");
    assert_eq!(h.snapshot_count(), 1);
}

#[test]
fn test_unreadable_stored_snapshot_loads_as_none() {
    let mut h = setup();
    h.engine
        .sync_snapshot(&mut h.conn, 1, &document(None), &UploadedParts::new())
        .unwrap();
    h.conn
        .execute("UPDATE snapshots SET snapshot = 'garbage' WHERE user_id = 1", [])
        .unwrap();

    assert_eq!(h.engine.load_snapshot(&h.conn, 1).unwrap(), None);
}
