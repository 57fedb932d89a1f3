// src/watch/set.rs

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::WatchRegistrationError;
use crate::fs::FileSystem;
use crate::types::WatchHandle;
use crate::watch::backend::WatchBackend;
use crate::watch::path_utils::watch_targets;
use crate::watch::{EventHandler, WatchDescriptor};

/// The live subscriptions of one session.
///
/// Only handles created through this set are ever touched by it, so several
/// sets can share one backend. Descriptors that could not be re-registered on
/// [`WatchSet::restore`] are parked as dormant and come back with the next
/// [`WatchSet::snapshot_and_clear`].
pub struct WatchSet {
    backend: Arc<dyn WatchBackend>,
    fs: Arc<dyn FileSystem>,
    active: BTreeMap<WatchHandle, WatchDescriptor>,
    dormant: Vec<WatchDescriptor>,
}

impl fmt::Debug for WatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSet")
            .field("active", &self.active.len())
            .field("dormant", &self.dormant.len())
            .finish()
    }
}

impl WatchSet {
    pub fn new(backend: Arc<dyn WatchBackend>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            backend,
            fs,
            active: BTreeMap::new(),
            dormant: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, handle: WatchHandle) -> bool {
        self.active.contains_key(&handle)
    }

    pub fn handles(&self) -> Vec<WatchHandle> {
        self.active.keys().copied().collect()
    }

    /// Paths currently watched (dormant descriptors excluded).
    pub fn paths(&self) -> BTreeSet<PathBuf> {
        self.active.values().map(|d| d.path.clone()).collect()
    }

    pub fn dormant_paths(&self) -> Vec<PathBuf> {
        self.dormant.iter().map(|d| d.path.clone()).collect()
    }

    /// Register one subscription and track it.
    pub fn add(
        &mut self,
        path: &Path,
        handler: EventHandler,
    ) -> Result<WatchHandle, WatchRegistrationError> {
        let handle = self.backend.subscribe(path, handler.clone())?;
        self.active.insert(
            handle,
            WatchDescriptor {
                path: path.to_path_buf(),
                handler,
            },
        );
        Ok(handle)
    }

    /// Watch `root`, expanding a directory into one subscription per file
    /// below it when `recursive` is set.
    ///
    /// Stops at the first failure; handles added before it stay in the set so
    /// the caller can roll the whole batch back.
    pub fn add_recursive(
        &mut self,
        root: &Path,
        handler: &EventHandler,
        recursive: bool,
    ) -> Result<Vec<WatchHandle>, WatchRegistrationError> {
        let targets = watch_targets(self.fs.as_ref(), root, recursive).map_err(|err| {
            WatchRegistrationError::new(
                root,
                notify::Error::generic(&format!("{err:#}")).add_path(root.to_path_buf()),
            )
        })?;

        if targets.is_empty() {
            warn!(?root, "directory contains no files; nothing to watch");
        }

        let mut handles = Vec::with_capacity(targets.len());
        for target in targets {
            handles.push(self.add(&target, handler.clone())?);
        }

        debug!(?root, recursive, count = handles.len(), "watch root registered");
        Ok(handles)
    }

    /// Remove every subscription and hand back what is needed to recreate
    /// them. Dormant descriptors are included.
    pub fn snapshot_and_clear(&mut self) -> Vec<WatchDescriptor> {
        let mut descriptors = Vec::with_capacity(self.active.len() + self.dormant.len());

        for (handle, descriptor) in std::mem::take(&mut self.active) {
            self.release(handle, &descriptor.path);
            descriptors.push(descriptor);
        }
        descriptors.append(&mut self.dormant);

        descriptors
    }

    /// Recreate subscriptions from descriptors captured by
    /// [`WatchSet::snapshot_and_clear`]. Returns how many were registered.
    ///
    /// Descriptors that fail are parked as dormant and retried with the next
    /// pause cycle. That retry needs a live watch to deliver the next event,
    /// so a restore that leaves nothing active fails with the last
    /// registration error (the dormant descriptors are kept).
    pub fn restore(
        &mut self,
        descriptors: Vec<WatchDescriptor>,
    ) -> Result<usize, WatchRegistrationError> {
        let mut restored = 0;
        let mut last_error = None;

        for descriptor in descriptors {
            match self.backend.subscribe(&descriptor.path, descriptor.handler.clone()) {
                Ok(handle) => {
                    self.active.insert(handle, descriptor);
                    restored += 1;
                }
                Err(err) => {
                    warn!(error = %err, "could not restore watch; will retry on next restore");
                    self.dormant.push(descriptor);
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if self.active.is_empty() => Err(err),
            _ => Ok(restored),
        }
    }

    /// Drop every subscription for good (cancellation, failed setup).
    pub fn remove_all(&mut self) {
        for (handle, descriptor) in std::mem::take(&mut self.active) {
            self.release(handle, &descriptor.path);
        }
        self.dormant.clear();
    }

    fn release(&self, handle: WatchHandle, path: &Path) {
        match self.backend.unsubscribe(handle) {
            Ok(true) => {}
            Ok(false) => debug!(%handle, ?path, "handle already gone"),
            Err(err) => warn!(%handle, ?path, error = %err, "failed to release watch"),
        }
    }
}
