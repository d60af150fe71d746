use bsync_store::{BucketManager, FileManager, ImportExport, MemoryStore, Store, VirtualFile};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use std::thread;

#[test]
fn test_put_file_replaces_all_slots() {
    let store = MemoryStore::new();
    store
        .put_file(
            VirtualFile::new("b", "f")
                .with_script(b"old".to_vec())
                .with_raw_data(b"bytes".to_vec()),
        )
        .unwrap();
    store
        .put_file(VirtualFile::new("b", "f").with_script(b"new".to_vec()))
        .unwrap();

    let stored = store.find_file("b", "f").unwrap();
    assert_eq!(stored.script.as_deref(), Some(&b"new"[..]));
    assert_eq!(stored.raw_data, None);
}

#[test]
fn test_each_bucket_lists_sorted_files() {
    let store = MemoryStore::new();
    store
        .import_files(vec![
            VirtualFile::new("b", "z"),
            VirtualFile::new("b", "a"),
            VirtualFile::new("a", "m"),
        ])
        .unwrap();

    let mut seen = Vec::new();
    store
        .each_bucket(&mut |bucket| {
            seen.push((bucket.name.clone(), bucket.files.clone()));
            Ok(())
        })
        .unwrap();

    assert_eq!(
        seen,
        vec![
            ("a".to_string(), vec!["m".to_string()]),
            ("b".to_string(), vec!["a".to_string(), "z".to_string()]),
        ]
    );
}

#[rstest]
#[case::file(false)]
#[case::bucket(true)]
fn test_delete_then_lookup_is_not_found(#[case] whole_bucket: bool) {
    let store = MemoryStore::new();
    store.put_file(VirtualFile::new("b", "f")).unwrap();

    if whole_bucket {
        store.delete_bucket("b").unwrap();
    } else {
        store.delete_file("b", "f").unwrap();
    }

    let err = store.find_file("b", "f").unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {}", err);
}

#[test]
fn test_concurrent_puts_to_same_key_converge() {
    let store = Arc::new(MemoryStore::new());
    let file = VirtualFile::new("b", "f").with_script(b"same".to_vec());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let file = file.clone();
            thread::spawn(move || store.put_file(file).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.find_file("b", "f").unwrap(), file);
    assert_eq!(store.file_count().unwrap(), 1);
}
