//! Synchronizer lifecycle

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use bsync_store::Store;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use super::hint::{ChangeHint, HintOp, apply_hint};
use super::worker::{SyncHandle, SyncWorker};
use crate::bootstrap::{BootstrapOutcome, bootstrap};
use crate::bridge::DataBridge;
use crate::classify::BridgeAction;
use crate::config::SyncConfig;
use crate::snapshot::WorkspaceSnapshot;
use crate::{Error, Result};

enum State {
    Uninit,
    /// Bootstrapped; the baseline waits for a worker to claim it
    Ready(WorkspaceSnapshot),
    /// The baseline now belongs to a worker
    Watching,
}

/// Keeps one workspace directory and one store in sync.
///
/// Lifecycle: [`init`](Self::init) reconciles both sides once, then
/// [`watch`](Self::watch) (or [`worker`](Self::worker) for manual driving)
/// takes over with periodic passes. Hints can be fed in at any time after
/// `init` through [`handle_hint`](Self::handle_hint) or
/// [`hint_callback`](Self::hint_callback).
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use bsync_core::{SyncConfig, Synchronizer};
/// use bsync_store::MemoryStore;
///
/// # async fn run() -> bsync_core::Result<()> {
/// let sync = Synchronizer::new("/data/workspace", Arc::new(MemoryStore::new()))
///     .with_config(SyncConfig::default());
/// sync.init()?;
/// let handle = sync.watch()?;
/// // ...
/// handle.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct Synchronizer {
    bridge: DataBridge,
    config: SyncConfig,
    nudge: Arc<Notify>,
    initialized: Arc<AtomicBool>,
    state: Mutex<State>,
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("root", &self.bridge.root())
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Synchronizer {
    pub fn new(root: impl Into<PathBuf>, store: Arc<dyn Store>) -> Self {
        Self {
            bridge: DataBridge::new(root, store),
            config: SyncConfig::default(),
            nudge: Arc::new(Notify::new()),
            initialized: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(State::Uninit),
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        self.bridge.root()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn bridge(&self) -> &DataBridge {
        &self.bridge
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| Error::Worker {
            message: "synchronizer state lock poisoned".to_string(),
        })
    }

    /// Run the bootstrap reconciliation.
    ///
    /// Only the first successful call does any work and returns its outcome;
    /// later calls return `Ok(None)`. A failed call leaves the synchronizer
    /// uninitialized so it can be retried.
    pub fn init(&self) -> Result<Option<BootstrapOutcome>> {
        let mut state = self.lock()?;
        if !matches!(*state, State::Uninit) {
            tracing::debug!("Already initialized");
            return Ok(None);
        }

        let outcome = bootstrap(&self.bridge, self.config.snapshot_options())?;
        *state = State::Ready(outcome.snapshot.clone());
        self.initialized.store(true, Ordering::Release);
        Ok(Some(outcome))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Hand the baseline to a new worker.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before `init`, [`Error::AlreadyWatching`]
    /// if a worker was already created.
    pub fn worker(&self) -> Result<SyncWorker> {
        let mut state = self.lock()?;
        let snapshot = match std::mem::replace(&mut *state, State::Watching) {
            State::Ready(snapshot) => snapshot,
            State::Uninit => {
                *state = State::Uninit;
                return Err(Error::NotInitialized);
            }
            State::Watching => return Err(Error::AlreadyWatching),
        };

        Ok(SyncWorker::new(
            self.bridge.clone(),
            snapshot,
            self.config.snapshot_options(),
            self.config.poll_interval(),
            Arc::clone(&self.nudge),
        ))
    }

    /// Spawn the worker on the current tokio runtime.
    pub fn watch(&self) -> Result<SyncHandle> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| Error::Worker {
            message: e.to_string(),
        })?;
        let worker = self.worker()?;
        let cancel = CancellationToken::new();
        let task = runtime.spawn(worker.run(cancel.clone()));
        Ok(SyncHandle::new(cancel, task))
    }

    /// Bridge one external hint right away and request an early pass.
    ///
    /// Returns the action that was applied, if the hint called for one.
    pub fn handle_hint(&self, hint: &ChangeHint) -> Result<Option<BridgeAction>> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        handle(&self.bridge, &self.nudge, hint)
    }

    /// A `(op, path, old_path)` callback suitable for a filesystem notifier.
    ///
    /// Failures are logged; the next polling pass is the backstop.
    pub fn hint_callback(&self) -> impl Fn(HintOp, &Path, Option<&Path>) + Send + Sync + 'static {
        let bridge = self.bridge.clone();
        let nudge = Arc::clone(&self.nudge);
        let initialized = Arc::clone(&self.initialized);

        move |op, path, old_path| {
            if !initialized.load(Ordering::Acquire) {
                tracing::debug!(path = %path.display(), "Hint before init ignored");
                return;
            }
            let hint = ChangeHint {
                op,
                path: path.to_path_buf(),
                old_path: old_path.map(Path::to_path_buf),
            };
            if let Err(e) = handle(&bridge, &nudge, &hint) {
                tracing::warn!(path = %path.display(), error = %e, "Hint failed");
            }
        }
    }
}

fn handle(bridge: &DataBridge, nudge: &Notify, hint: &ChangeHint) -> Result<Option<BridgeAction>> {
    let result = apply_hint(bridge, hint);
    nudge.notify_one();
    if let Ok(Some(action)) = &result {
        tracing::debug!(%action, "Hint bridged");
    }
    result
}
