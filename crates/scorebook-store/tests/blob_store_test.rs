#![allow(clippy::unwrap_used, clippy::expect_used)]

use scorebook_store::{FsBlobStore, RemoveOutcome};
use std::fs;
use tempfile::TempDir;

fn setup() -> (FsBlobStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = FsBlobStore::new(dir.path().join("uploads").join("scores"));
    store.ensure_root().unwrap();
    (store, dir)
}

#[test]
fn test_write_is_visible_under_root() {
    let (store, _dir) = setup();
    store.write("page-1.png", &[1, 2, 3]).unwrap();

    let on_disk = fs::read(store.root().join("page-1.png")).unwrap();
    assert_eq!(on_disk, vec![1, 2, 3]);
    assert_eq!(store.list().unwrap(), vec!["page-1.png"]);
}

#[test]
fn test_overwrite_replaces_content() {
    let (store, _dir) = setup();
    store.write("a.png", b"first").unwrap();
    store.write("a.png", b"second").unwrap();
    assert_eq!(store.read("a.png").unwrap(), b"second");
}

#[test]
fn test_remove_twice_is_tolerated() {
    let (store, _dir) = setup();
    store.write("gone.png", b"x").unwrap();

    assert_eq!(store.remove("gone.png").unwrap(), RemoveOutcome::Removed);
    assert_eq!(store.remove("gone.png").unwrap(), RemoveOutcome::Missing);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_traversal_names_never_touch_parent() {
    let (store, dir) = setup();
    let outside = dir.path().join("uploads").join("secret.txt");
    fs::write(&outside, b"keep").unwrap();

    assert!(store.remove("../secret.txt").is_err());
    assert!(outside.exists());
}
