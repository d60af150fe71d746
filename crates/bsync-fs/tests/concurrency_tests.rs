//! Concurrent access tests for write_atomic
//!
//! Every writer gets its own temp file, so concurrent writes never interleave.

use bsync_fs::io;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

#[test]
fn test_concurrent_writes_no_corruption() {
    let dir = tempdir().unwrap();
    let file_path = Arc::new(dir.path().join(".sync-index"));

    let num_threads = 8;
    let writes_per_thread = 20;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let path = Arc::clone(&file_path);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                for i in 0..writes_per_thread {
                    let content = format!("thread{}:write{}\n", thread_id, i);
                    io::write_atomic(&path, content.as_bytes()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let content = std::fs::read_to_string(file_path.as_ref()).unwrap();
    assert!(content.starts_with("thread"), "got: {}", content);
    assert_eq!(content.matches("thread").count(), 1);
    assert_eq!(content.lines().count(), 1);
}
