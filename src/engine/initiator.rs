// src/engine/initiator.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::engine::session::{SessionOptions, WatchSession};
use crate::engine::SessionId;
use crate::errors::{PausewatchError, Result};
use crate::exec::{ActionRegistry, ActionRunner, ActionSpec, ResultSink};
use crate::fs::FileSystem;
use crate::watch::path_utils::resolve_paths;
use crate::watch::{EventHandler, WatchBackend, WatchSet};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Builds watch sessions on top of a shared set of collaborators.
pub struct Initiator {
    backend: Arc<dyn WatchBackend>,
    fs: Arc<dyn FileSystem>,
    registry: Arc<ActionRegistry>,
    sink: Arc<dyn ResultSink>,
    default_dir: PathBuf,
}

impl fmt::Debug for Initiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initiator")
            .field("backend", &self.backend)
            .field("default_dir", &self.default_dir)
            .finish_non_exhaustive()
    }
}

impl Initiator {
    /// The default watch target is the current working directory.
    pub fn new(
        backend: Arc<dyn WatchBackend>,
        fs: Arc<dyn FileSystem>,
        registry: Arc<ActionRegistry>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            backend,
            fs,
            registry,
            sink,
            default_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Watch `dir` when no usable path is given.
    pub fn with_default_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_dir = dir.into();
        self
    }

    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Validate `action`, install watches for every path and return the
    /// armed session.
    ///
    /// Either every watch is installed or none is: on the first registration
    /// failure all handles created so far are removed and
    /// [`PausewatchError::WatchSetup`] is returned.
    pub fn start(
        &self,
        paths: &[String],
        action: ActionSpec,
        options: SessionOptions,
    ) -> Result<WatchSession> {
        action.validate(&self.registry)?;

        let id: SessionId = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let handler = EventHandler::new(id, events_tx.clone());

        let roots = resolve_paths(paths, &self.default_dir);
        let mut set = WatchSet::new(Arc::clone(&self.backend), Arc::clone(&self.fs));

        for root in &roots {
            if let Err(err) = set.add_recursive(root, &handler, options.recursive) {
                let rolled_back = set.len();
                set.remove_all();
                warn!(
                    session = id,
                    rolled_back,
                    error = %err,
                    "watch setup failed; removed watches created so far"
                );
                return Err(PausewatchError::WatchSetup(err));
            }
        }

        info!(
            session = id,
            ?roots,
            watches = set.len(),
            watch_for_creations = options.watch_for_creations,
            recursive = options.recursive,
            action = %action.describe(),
            "session armed"
        );

        Ok(WatchSession::new(
            id,
            set,
            action,
            ActionRunner::new(Arc::clone(&self.registry)),
            Arc::clone(&self.sink),
            options,
            events_tx,
            events_rx,
        ))
    }
}
