#![allow(clippy::unwrap_used, clippy::expect_used)]

use rusqlite::Connection;
use scorebook_core::model::ScoreRecord;
use scorebook_core::{ExErrorKind, PlannedWrite, PreparedScore, ReconcilePlan};
use scorebook_store::migrations::apply_migrations;
use scorebook_store::{commit_plan, db, ScoreFields, ScoreRepo};
use std::collections::BTreeSet;

fn setup() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    db::configure(&conn).unwrap();
    apply_migrations(&mut conn).unwrap();
    conn
}

fn prepared(title: &str, files: &[&str]) -> PreparedScore {
    let pages: Vec<serde_json::Value> = files
        .iter()
        .enumerate()
        .map(|(i, f)| serde_json::json!({"filename": f, "order": i}))
        .collect();
    PreparedScore {
        claimed_id: None,
        title: title.to_string(),
        composer: String::new(),
        description: String::new(),
        config_json: serde_json::json!({ "pages": pages }).to_string(),
        cover_filename: files.first().map(|f| f.to_string()).unwrap_or_default(),
        filenames: files.iter().map(|f| f.to_string()).collect(),
    }
}

fn seed(conn: &Connection, user_id: i64, title: &str) -> ScoreRecord {
    let score = prepared(title, &["seed.png"]);
    ScoreRepo::insert(conn, user_id, ScoreFields::from(&score)).unwrap()
}

#[test]
fn test_commit_applies_creates_updates_and_deletes() {
    let mut conn = setup();
    let keep = seed(&conn, 1, "Keep");
    let removed = seed(&conn, 1, "Drop");

    let plan = ReconcilePlan {
        writes: vec![
            PlannedWrite::Update {
                id: keep.id,
                score: prepared("Kept", &["new.png"]),
            },
            PlannedWrite::Create(prepared("Fresh", &["fresh.png"])),
        ],
        deletes: vec![removed.id],
        orphan_candidates: BTreeSet::new(),
    };

    let tx = conn.transaction().unwrap();
    let result = commit_plan(&tx, 1, &plan).unwrap();
    tx.commit().unwrap();

    assert_eq!(result.saved.len(), 2);
    assert_eq!(result.saved[0].id, keep.id);
    assert_eq!(result.saved[0].title, "Kept");
    assert_eq!(result.saved[0].image_filename, "new.png");
    assert_eq!(result.deleted, vec![removed.id]);

    let titles: BTreeSet<String> = ScoreRepo::list_for_user(&conn, 1)
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, BTreeSet::from(["Fresh".to_string(), "Kept".to_string()]));
}

#[test]
fn test_dropped_transaction_rolls_back_every_write() {
    let mut conn = setup();
    let existing = seed(&conn, 1, "Original");

    let plan = ReconcilePlan {
        writes: vec![
            PlannedWrite::Create(prepared("Ghost", &["ghost.png"])),
            PlannedWrite::Update {
                id: existing.id,
                score: prepared("Changed", &[]),
            },
        ],
        deletes: vec![],
        orphan_candidates: BTreeSet::new(),
    };

    {
        let tx = conn.transaction().unwrap();
        commit_plan(&tx, 1, &plan).unwrap();
        // dropped without commit
    }

    let rows = ScoreRepo::list_for_user(&conn, 1).unwrap();
    assert_eq!(rows, vec![existing]);
}

#[test]
fn test_update_of_vanished_row_fails() {
    let mut conn = setup();
    let created = seed(&conn, 1, "Before");

    let plan = ReconcilePlan {
        writes: vec![
            PlannedWrite::Create(prepared("Side effect", &[])),
            PlannedWrite::Update {
                id: created.id + 100,
                score: prepared("Nowhere", &[]),
            },
        ],
        deletes: vec![],
        orphan_candidates: BTreeSet::new(),
    };

    let tx = conn.transaction().unwrap();
    let err = commit_plan(&tx, 1, &plan).unwrap_err();
    drop(tx);

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.op(), Some("update_score"));
    assert_eq!(ScoreRepo::list_for_user(&conn, 1).unwrap().len(), 1);
}

#[test]
fn test_commit_never_touches_other_users() {
    let mut conn = setup();
    let foreign = seed(&conn, 2, "Theirs");

    let plan = ReconcilePlan {
        writes: vec![],
        deletes: vec![foreign.id],
        orphan_candidates: BTreeSet::new(),
    };

    let tx = conn.transaction().unwrap();
    let result = commit_plan(&tx, 1, &plan).unwrap();
    tx.commit().unwrap();

    assert!(result.deleted.is_empty());
    assert_eq!(ScoreRepo::list_for_user(&conn, 2).unwrap().len(), 1);
}
