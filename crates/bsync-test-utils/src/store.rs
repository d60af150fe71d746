//! Store fixtures.

use std::sync::Arc;

use bsync_store::{FileManager, JsonMap, MemoryStore, VirtualFile};

/// Builds a JSON object from a `serde_json::json!` value.
///
/// # Panics
/// Panics if `value` is not an object.
pub fn json_object(value: serde_json::Value) -> JsonMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("json_object: expected an object, got {other}"),
    }
}

/// Two buckets, three files, every slot kind represented at least once.
///
/// ```text
/// bucket1/file1   meta + structural + script
/// bucket1/file2   raw
/// bucket2/file3   meta
/// ```
pub fn sample_files() -> Vec<VirtualFile> {
    vec![
        VirtualFile::new("bucket1", "file1")
            .with_metadata(json_object(serde_json::json!({"name": "first", "version": 1})))
            .with_structural_data(json_object(serde_json::json!({"nodes": [1, 2, 3]})))
            .with_script("return 42\n"),
        VirtualFile::new("bucket1", "file2").with_raw_data(vec![0u8, 1, 2, 255]),
        VirtualFile::new("bucket2", "file3")
            .with_metadata(json_object(serde_json::json!({"name": "third"}))),
    ]
}

/// A [`MemoryStore`] holding exactly `files`.
///
/// # Panics
/// Panics if a write fails.
pub fn store_with(files: impl IntoIterator<Item = VirtualFile>) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for file in files {
        store
            .put_file(file)
            .unwrap_or_else(|e| panic!("store_with: failed to put file: {e}"));
    }
    Arc::new(store)
}

/// A [`MemoryStore`] holding [`sample_files`].
pub fn populated_store() -> Arc<MemoryStore> {
    store_with(sample_files())
}
