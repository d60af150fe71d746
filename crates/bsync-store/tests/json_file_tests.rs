use bsync_store::{BucketManager, FileManager, ImportExport, JsonFileStore, Store, VirtualFile};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn sample_file() -> VirtualFile {
    VirtualFile::new("scenes", "intro")
        .with_script(b"print('hi')".to_vec())
        .with_metadata(json!({"author": "me"}).as_object().cloned().unwrap())
}

#[test]
fn test_open_missing_file_starts_empty() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::open(temp.path().join("store.json")).unwrap();
    assert!(!store.has_data().unwrap());
    assert!(!store.path().exists());
}

#[test]
fn test_mutations_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");

    {
        let store = JsonFileStore::open(&path).unwrap();
        store.put_file(sample_file()).unwrap();
        store.create_bucket("empty").unwrap();
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.find_file("scenes", "intro").unwrap(), sample_file());
    assert_eq!(
        reopened.bucket_names().unwrap(),
        vec!["empty".to_string(), "scenes".to_string()]
    );
}

#[test]
fn test_delete_bucket_is_persisted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");

    let store = JsonFileStore::open(&path).unwrap();
    store.import_files(vec![sample_file()]).unwrap();
    store.delete_bucket("scenes").unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert!(!reopened.has_data().unwrap());
    assert!(reopened.export_bucket("scenes").unwrap().is_empty());
}

#[test]
fn test_corrupt_document_fails_to_open() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(JsonFileStore::open(&path).is_err());
}

#[test]
fn test_failed_flush_leaves_memory_unchanged() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    let store = JsonFileStore::open(&path).unwrap();
    store.put_file(sample_file()).unwrap();

    // A non-empty directory where the document lives makes the rename fail
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("blocker"), "x").unwrap();

    assert!(store.put_file(VirtualFile::new("scenes", "outro")).is_err());
    assert!(store.delete_bucket("scenes").is_err());

    assert!(store.find_file("scenes", "outro").unwrap_err().is_not_found());
    assert_eq!(store.find_file("scenes", "intro").unwrap(), sample_file());
    assert_eq!(store.bucket_names().unwrap(), vec!["scenes".to_string()]);
}
