use assert_fs::prelude::*;
use bsync_fs::io;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bucket").join("file").join("meta.json");

    io::write_atomic(&path, b"{}").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = assert_fs::TempDir::new().unwrap();
    let child = temp.child(".sync-index");
    child.write_str("original").unwrap();

    io::write_atomic(child.path(), b"updated").unwrap();

    child.assert("updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".sync-index");

    io::write_atomic(&path, b"one").unwrap();
    io::write_atomic(&path, b"two").unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec![".sync-index".to_string()]);
}

#[test]
fn test_read_bytes_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let err = io::read_bytes(&temp.path().join("missing")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_ensure_dir_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("a").join("b");
    io::ensure_dir(&dir).unwrap();
    io::ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
}
