//! The polling worker

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::report::PassReport;
use crate::bridge::DataBridge;
use crate::classify::plan;
use crate::diff::diff;
use crate::snapshot::{SnapshotOptions, WorkspaceSnapshot, index_path};
use crate::{Error, Result};

/// Sole owner of the held snapshot once continuous sync starts.
///
/// Each [`pass`](Self::pass) re-scans the workspace, diffs against the held
/// snapshot, bridges the result to the store and persists the new baseline.
/// [`run`](Self::run) drives passes from a timer and from hint nudges.
pub struct SyncWorker {
    bridge: DataBridge,
    snapshot: WorkspaceSnapshot,
    options: SnapshotOptions,
    poll_interval: Duration,
    nudge: Arc<Notify>,
}

impl std::fmt::Debug for SyncWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncWorker")
            .field("root", &self.bridge.root())
            .field("entries", &self.snapshot.len())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl SyncWorker {
    pub(crate) fn new(
        bridge: DataBridge,
        snapshot: WorkspaceSnapshot,
        options: SnapshotOptions,
        poll_interval: Duration,
        nudge: Arc<Notify>,
    ) -> Self {
        Self {
            bridge,
            snapshot,
            options,
            poll_interval,
            nudge,
        }
    }

    /// The baseline the next pass diffs against.
    pub fn snapshot(&self) -> &WorkspaceSnapshot {
        &self.snapshot
    }

    /// Run one re-scan, diff, bridge, persist cycle.
    ///
    /// Per-action failures are logged and collected in the report; they do
    /// not stop the pass. The held snapshot is replaced and persisted only
    /// when the diff was non-empty.
    ///
    /// # Errors
    ///
    /// [`Error::WorkspaceRemoved`] if the root is gone or its deletion shows
    /// up in the diff. Walk and persistence failures are returned as-is and
    /// leave the held snapshot untouched.
    pub fn pass(&mut self) -> Result<PassReport> {
        let root = self.bridge.root();
        if !root.exists() {
            return Err(Error::WorkspaceRemoved {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(Error::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let current = WorkspaceSnapshot::build(root, self.options)?;
        let changes = diff(&self.snapshot, &current);
        if changes.is_empty() {
            return Ok(PassReport::default());
        }
        for change in &changes {
            tracing::debug!(%change, "Detected change");
        }

        let mut report = PassReport {
            changes: changes.len(),
            ..PassReport::default()
        };
        for action in plan(&changes, root)? {
            match self.bridge.apply(&action) {
                Ok(()) => report.actions.push(action.to_string()),
                Err(e) => {
                    tracing::warn!(%action, error = %e, "Bridge action failed");
                    report.errors.push(format!("{}: {}", action, e));
                }
            }
        }

        current.save(&index_path(root))?;
        self.snapshot = current;

        tracing::info!(
            changes = report.changes,
            actions = report.actions.len(),
            errors = report.errors.len(),
            "Sync pass complete"
        );
        Ok(report)
    }

    /// Run passes until `cancel` fires or a fatal error occurs.
    ///
    /// A pass runs on every tick of the poll interval and whenever a hint
    /// nudges the worker; a nudge restarts the interval. Passes execute on
    /// the blocking pool since they do filesystem and store I/O.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; bootstrap already did that work.
        ticker.tick().await;

        let nudge = Arc::clone(&self.nudge);
        tracing::info!(
            root = %self.bridge.root().display(),
            interval_ms = self.poll_interval.as_millis() as u64,
            "Sync worker started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Sync worker stopped");
                    return Ok(());
                }
                _ = nudge.notified() => {
                    tracing::debug!("Pass requested by hint");
                    ticker.reset();
                }
                _ = ticker.tick() => {}
            }

            let (worker, result) = tokio::task::spawn_blocking(move || {
                let result = self.pass();
                (self, result)
            })
            .await
            .map_err(|e| Error::Worker {
                message: e.to_string(),
            })?;
            self = worker;

            match result {
                Ok(report) if !report.is_clean() => {
                    tracing::warn!(failed = report.errors.len(), "Sync pass finished with errors");
                }
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    tracing::error!(error = %e, "Sync worker stopping");
                    return Err(e);
                }
                Err(e) => tracing::warn!(error = %e, "Sync pass failed, retrying next tick"),
            }
        }
    }
}

/// Handle to a worker spawned by [`Synchronizer::watch`](super::Synchronizer::watch).
#[derive(Debug)]
pub struct SyncHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl SyncHandle {
    pub(crate) fn new(cancel: CancellationToken, task: JoinHandle<Result<()>>) -> Self {
        Self { cancel, task }
    }

    /// Ask the worker to stop after its current pass.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the worker to end and return how it ended.
    pub async fn join(self) -> Result<()> {
        self.task.await.map_err(|e| Error::Worker {
            message: e.to_string(),
        })?
    }

    /// [`shutdown`](Self::shutdown) then [`join`](Self::join).
    pub async fn stop(self) -> Result<()> {
        self.shutdown();
        self.join().await
    }
}
