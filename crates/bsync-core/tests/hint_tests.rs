//! Tests for external change hints

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bsync_core::{BridgeAction, ChangeHint, Error, HintOp, Synchronizer};
use bsync_store::{FileManager, MemoryStore, Store};
use bsync_test_utils::{empty_workspace, populated_store, workspace_with, write_slot};
use pretty_assertions::assert_eq;

#[test]
fn test_hint_before_init_is_rejected() {
    let ws = empty_workspace();
    let sync = Synchronizer::new(ws.path(), Arc::new(MemoryStore::new()));

    let err = sync
        .handle_hint(&ChangeHint::new(HintOp::CreateOrModify, "b/f/meta.json"))
        .unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
}

#[test]
fn test_slot_hint_imports_immediately() {
    let ws = empty_workspace();
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(ws.path(), store.clone());
    sync.init().unwrap();

    write_slot(ws.path(), "b/f/script.lua", "hinted");
    let action = sync
        .handle_hint(&ChangeHint::new(HintOp::CreateOrModify, ws.path().join("b/f/script.lua")))
        .unwrap();

    assert_eq!(
        action,
        Some(BridgeAction::ImportFile {
            bucket: "b".into(),
            file: "f".into()
        })
    );
    assert_eq!(store.find_file("b", "f").unwrap().script.unwrap(), b"hinted".to_vec());
}

#[test]
fn test_relative_hint_paths_are_accepted() {
    let ws = workspace_with(&[("b/f/meta.json", "{}")]);
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(ws.path(), store.clone());
    sync.init().unwrap();

    fs::remove_dir_all(ws.path().join("b/f")).unwrap();
    let action = sync.handle_hint(&ChangeHint::new(HintOp::Remove, "b/f")).unwrap();

    assert_eq!(
        action,
        Some(BridgeAction::DeleteFile {
            bucket: "b".into(),
            file: "f".into()
        })
    );
    assert!(!store.has_file("b", "f").unwrap());
}

#[test]
fn test_bucket_remove_hint_deletes_bucket() {
    let ws = empty_workspace();
    let store = populated_store();
    let sync = Synchronizer::new(ws.path(), store.clone());
    sync.init().unwrap();

    fs::remove_dir_all(ws.path().join("bucket2")).unwrap();
    sync.handle_hint(&ChangeHint::new(HintOp::Remove, ws.path().join("bucket2")))
        .unwrap();

    assert_eq!(store.bucket_names().unwrap(), vec!["bucket1".to_string()]);
}

#[test]
fn test_container_creation_hint_does_nothing() {
    let ws = empty_workspace();
    let sync = Synchronizer::new(ws.path(), Arc::new(MemoryStore::new()));
    sync.init().unwrap();

    fs::create_dir_all(ws.path().join("b/f")).unwrap();
    assert_eq!(sync.handle_hint(&ChangeHint::new(HintOp::CreateOrModify, "b")).unwrap(), None);
    assert_eq!(sync.handle_hint(&ChangeHint::new(HintOp::CreateOrModify, "b/f")).unwrap(), None);
}

#[test]
fn test_rename_hints_are_left_to_the_pass() {
    let ws = workspace_with(&[("b/f/meta.json", "{}")]);
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(ws.path(), store.clone());
    sync.init().unwrap();

    fs::rename(ws.path().join("b/f"), ws.path().join("b/g")).unwrap();
    for op in [HintOp::RenameFile, HintOp::RenameDir] {
        let hint = ChangeHint::renamed(op, ws.path().join("b/f"), ws.path().join("b/g"));
        assert_eq!(sync.handle_hint(&hint).unwrap(), None);
    }

    // Store untouched until the worker's pass
    assert!(store.has_file("b", "f").unwrap());
    assert!(!store.has_file("b", "g").unwrap());

    let mut worker = sync.worker().unwrap();
    worker.pass().unwrap();
    assert!(!store.has_file("b", "f").unwrap());
    assert!(store.has_file("b", "g").unwrap());
}

#[test]
fn test_index_hint_is_ignored() {
    let ws = empty_workspace();
    let sync = Synchronizer::new(ws.path(), Arc::new(MemoryStore::new()));
    sync.init().unwrap();

    let hint = ChangeHint::new(HintOp::CreateOrModify, ws.path().join(".sync-index"));
    assert_eq!(sync.handle_hint(&hint).unwrap(), None);
}

#[test]
fn test_hint_outside_workspace_fails() {
    let ws = empty_workspace();
    let sync = Synchronizer::new(ws.path(), Arc::new(MemoryStore::new()));
    sync.init().unwrap();

    let hint = ChangeHint::new(HintOp::CreateOrModify, "/somewhere/else/b/f/x");
    assert!(sync.handle_hint(&hint).is_err());
}

#[test]
fn test_hint_climbing_out_of_workspace_fails() {
    let parent = empty_workspace();
    let root = parent.path().join("ws");
    write_slot(parent.path(), "secret/f/script.lua", "password");
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(&root, store.clone());
    sync.init().unwrap();

    for path in [Path::new("../secret/f/script.lua").to_path_buf(), root.join("../secret/f/script.lua")] {
        let err = sync
            .handle_hint(&ChangeHint::new(HintOp::CreateOrModify, path))
            .unwrap_err();
        assert!(matches!(err, Error::Fs(bsync_fs::Error::OutsideWorkspace { .. })), "got {err:?}");
    }
    assert!(!store.has_data().unwrap());
}

#[test]
fn test_root_remove_hint_is_fatal() {
    let ws = empty_workspace();
    let sync = Synchronizer::new(ws.path(), Arc::new(MemoryStore::new()));
    sync.init().unwrap();

    let err = sync
        .handle_hint(&ChangeHint::new(HintOp::Remove, ws.path()))
        .unwrap_err();
    assert!(matches!(err, Error::WorkspaceRemoved { .. }));
}

#[test]
fn test_callback_bridges_and_swallows_errors() {
    let ws = empty_workspace();
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(ws.path(), store.clone());
    let callback = sync.hint_callback();

    // Ignored before init
    write_slot(ws.path(), "b/f/meta.json", "{}");
    callback(HintOp::CreateOrModify, &ws.path().join("b/f/meta.json"), None);
    assert!(!store.has_file("b", "f").unwrap());

    sync.init().unwrap();
    // init imported the tree; change it and hint again
    write_slot(ws.path(), "b/f/script.lua", "cb");
    callback(HintOp::CreateOrModify, &ws.path().join("b/f/script.lua"), None);
    assert_eq!(store.find_file("b", "f").unwrap().script.unwrap(), b"cb".to_vec());

    // Errors are logged, not raised
    callback(HintOp::CreateOrModify, Path::new("/outside/x/y/z"), None);
}
