//! Continuous synchronization
//!
//! This module provides:
//! - **Synchronizer**: owns bootstrap state and hands out the single worker
//! - **SyncWorker**: the re-scan, diff, bridge, persist pass and its timer loop
//! - **hints**: external change notifications that bridge immediately and
//!   request an early pass

mod hint;
mod report;
mod synchronizer;
mod worker;

pub use hint::{ChangeHint, HintOp};
pub use report::PassReport;
pub use synchronizer::Synchronizer;
pub use worker::{SyncHandle, SyncWorker};
