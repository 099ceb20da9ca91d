#![allow(dead_code)]

use rusqlite::Connection;
use scorebook_core::model::SNAPSHOT_FORMAT;
use scorebook_core::SyncConfig;
use scorebook_engine::SyncEngine;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tempfile::TempDir;

/// 1x1 transparent PNG
pub const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct Harness {
    pub dir: TempDir,
    pub engine: SyncEngine,
    pub conn: Connection,
}

pub fn setup() -> Harness {
    setup_with(|_| {})
}

pub fn setup_with(adjust: impl FnOnce(&mut SyncConfig)) -> Harness {
    let dir = TempDir::new().unwrap();
    let mut config = SyncConfig {
        database_path: dir.path().join("db.sqlite"),
        upload_dir: dir.path().join("uploads").join("scores"),
        ..SyncConfig::default()
    };
    adjust(&mut config);
    let engine = SyncEngine::new(config);
    let conn = engine.connect().unwrap();
    Harness { dir, engine, conn }
}

impl Harness {
    pub fn files(&self) -> BTreeSet<String> {
        self.engine.blobs().list().unwrap().into_iter().collect()
    }

    pub fn score_ids(&self, user_id: i64) -> BTreeSet<i64> {
        self.engine
            .list_scores(&self.conn, user_id)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect()
    }

    pub fn snapshot_count(&self) -> i64 {
        self.conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
            .unwrap()
    }
}

pub fn document(scores: Option<Value>) -> Value {
    let mut doc = json!({
        "format": SNAPSHOT_FORMAT,
        "version": 1,
        "exportedAt": "2024-06-01T12:00:00.000Z",
        "pages": [],
        "apiConfig": {},
        "examHistory": {},
        "pdf": null
    });
    if let Some(scores) = scores {
        doc["scores"] = scores;
    }
    doc
}

pub fn score(id: Option<i64>, title: &str, pages: usize) -> Value {
    let pages: Vec<Value> = (0..pages)
        .map(|i| json!({"order": i, "image": {"encoding": "base64", "data": PNG_1X1, "mimeType": "image/png"}}))
        .collect();
    let mut score = json!({"title": title, "composer": "Chopin", "pages": pages});
    if let Some(id) = id {
        score["id"] = json!(id);
    }
    score
}
