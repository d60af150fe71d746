//! Synchronization engine for bucketsync
//!
//! Keeps a directory tree (the workspace) and a bucket/file key-value store
//! consistent, with the workspace as the source of truth once startup is
//! done:
//!
//! - **Snapshot & diff**: record every entry under the workspace root and
//!   compute create/modify/delete changes between two records
//! - **Classifier**: map a changed path to the store operation it implies
//! - **Data bridge**: move virtual files between disk and store
//! - **Bootstrap**: one-time export or import when sync starts
//! - **Sync loop**: periodic re-scan, plus hints that trigger an early pass
//!
//! # Architecture
//!
//! ```text
//!                   bsync-cli
//!                       |
//!                  bsync-core
//!                   |       |
//!             bsync-store   |
//!                   |       |
//!                  bsync-fs-+
//! ```
//!
//! # Layout
//!
//! ```text
//! <root>/.sync-index                       persisted snapshot
//! <root>/<bucket>/<file>/meta.json         Metadata
//! <root>/<bucket>/<file>/structural_data.json
//! <root>/<bucket>/<file>/script.lua
//! <root>/<bucket>/<file>/<anything else>   RawData
//! ```

pub mod bootstrap;
pub mod bridge;
pub mod classify;
pub mod config;
pub mod diff;
pub mod error;
pub mod snapshot;
pub mod sync;

pub use bootstrap::{BootstrapAction, BootstrapOutcome, bootstrap, workspace_has_data};
pub use bridge::{DataBridge, TransferReport};
pub use classify::{BridgeAction, PathClass, action_for, classify, plan};
pub use config::SyncConfig;
pub use diff::{ChangeKind, ChangeOp, diff};
pub use error::{Error, Result};
pub use snapshot::{FileRecord, SnapshotOptions, WorkspaceSnapshot, index_path};
pub use sync::{ChangeHint, HintOp, PassReport, SyncHandle, SyncWorker, Synchronizer};
