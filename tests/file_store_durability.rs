//! File Store Durability Tests
//!
//! - Posts survive reopening the store
//! - The id counter survives reopening, even past deletions
//! - A corrupted snapshot is never loaded

use std::fs;

use postd::store::{FileStore, PostFields, PostStore, StoreError, SNAPSHOT_FILE_NAME};
use tempfile::TempDir;

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[test]
fn test_posts_survive_reopen() {
    let temp_dir = create_temp_data_dir();

    let created = {
        let store = FileStore::open(temp_dir.path()).unwrap();
        let a = store.insert(PostFields::new("first", "one")).unwrap();
        let b = store.insert(PostFields::new("second", "two")).unwrap();
        store.update(b.id, PostFields::new("second", "deux")).unwrap();
        vec![a.id, b.id]
    };

    let store = FileStore::open(temp_dir.path()).unwrap();
    let posts = store.all().unwrap();
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), created);
    assert_eq!(posts[1].description, "deux");
    assert!(posts[1].updated_at >= posts[1].created_at);
}

#[test]
fn test_id_counter_survives_reopen_after_delete() {
    let temp_dir = create_temp_data_dir();

    {
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.insert(PostFields::new("a", "1")).unwrap();
        let b = store.insert(PostFields::new("b", "2")).unwrap();
        store.delete(b.id).unwrap();
    }

    let store = FileStore::open(temp_dir.path()).unwrap();
    let c = store.insert(PostFields::new("c", "3")).unwrap();
    assert_eq!(c.id, 3);
}

#[test]
fn test_corrupted_snapshot_fails_to_open() {
    let temp_dir = create_temp_data_dir();
    let snapshot_path = temp_dir.path().join(SNAPSHOT_FILE_NAME);

    {
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.insert(PostFields::new("original title", "body")).unwrap();
    }

    // Tamper with stored content without fixing the checksum
    let contents = fs::read_to_string(&snapshot_path).unwrap();
    fs::write(&snapshot_path, contents.replace("original title", "tampered title")).unwrap();

    let err = FileStore::open(temp_dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupted { .. }));
}

#[test]
fn test_truncated_snapshot_fails_to_open() {
    let temp_dir = create_temp_data_dir();
    let snapshot_path = temp_dir.path().join(SNAPSHOT_FILE_NAME);

    {
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.insert(PostFields::new("a", "b")).unwrap();
    }

    let contents = fs::read(&snapshot_path).unwrap();
    fs::write(&snapshot_path, &contents[..contents.len() / 2]).unwrap();

    let err = FileStore::open(temp_dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

#[test]
fn test_failed_open_leaves_snapshot_untouched() {
    let temp_dir = create_temp_data_dir();
    let snapshot_path = temp_dir.path().join(SNAPSHOT_FILE_NAME);
    fs::write(&snapshot_path, b"not json").unwrap();

    assert!(FileStore::open(temp_dir.path()).is_err());
    assert_eq!(fs::read(&snapshot_path).unwrap(), b"not json");
}
