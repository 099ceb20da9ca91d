#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{document, score, setup};
use scorebook_engine::UploadedParts;
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_syncs_of_one_user_stay_consistent() {
    let h = setup();
    let engine = Arc::new(h.engine);

    // Open every connection up front; migrations already ran in setup.
    let connections: Vec<_> = (0..4).map(|_| engine.connect().unwrap()).collect();

    let handles: Vec<_> = connections
        .into_iter()
        .enumerate()
        .map(|(i, mut conn)| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let doc = document(Some(json!([score(None, &format!("Take {}", i), 1)])));
                engine
                    .sync_snapshot(&mut conn, 1, &doc, &UploadedParts::new())
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // The last writer wins: one score, one file, nothing leaked
    let scores = engine.list_scores(&h.conn, 1).unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(engine.blobs().list().unwrap(), vec![scores[0].pages[0].filename.clone()]);
}
