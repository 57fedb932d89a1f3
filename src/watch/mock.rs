// src/watch/mock.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::WatchRegistrationError;
use crate::fs::FileSystem;
use crate::types::{ActionKind, WatchHandle};
use crate::watch::backend::{lock, SubscriptionTable, WatchBackend};
use crate::watch::EventHandler;

/// Deterministic backend for tests.
///
/// Nothing touches the OS: tests inject events with [`ManualBackend::emit`],
/// and paths are stored verbatim. Registration fails for paths marked with
/// [`ManualBackend::reject`], and (when a filesystem is attached) for paths
/// that do not exist in it.
#[derive(Debug, Default)]
pub struct ManualBackend {
    table: Mutex<SubscriptionTable>,
    rejected: Mutex<HashSet<PathBuf>>,
    subscribe_calls: Mutex<Vec<PathBuf>>,
    fs: Option<Arc<dyn FileSystem>>,
}

impl ManualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse subscriptions for paths missing from `fs`.
    pub fn with_filesystem(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs: Some(fs),
            ..Self::default()
        }
    }

    /// Make every future `subscribe` for `path` fail.
    pub fn reject(&self, path: impl Into<PathBuf>) {
        lock(&self.rejected).insert(path.into());
    }

    /// Undo [`ManualBackend::reject`].
    pub fn accept(&self, path: &Path) {
        lock(&self.rejected).remove(path);
    }

    /// Inject an event for `path`. Returns how many subscriptions received it.
    pub fn emit(&self, kind: ActionKind, path: impl AsRef<Path>) -> usize {
        lock(&self.table).dispatch(kind, path.as_ref(), None)
    }

    pub fn emit_rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> usize {
        lock(&self.table).dispatch(ActionKind::Renamed, from.as_ref(), Some(to.as_ref()))
    }

    /// Every subscribed path, once per live handle, sorted.
    pub fn active_paths(&self) -> Vec<PathBuf> {
        lock(&self.table).subscribed_paths()
    }

    /// Paths passed to `subscribe` (in call order), including rejected ones.
    pub fn subscribe_calls(&self) -> Vec<PathBuf> {
        lock(&self.subscribe_calls).clone()
    }
}

impl WatchBackend for ManualBackend {
    fn subscribe(
        &self,
        path: &Path,
        handler: EventHandler,
    ) -> Result<WatchHandle, WatchRegistrationError> {
        lock(&self.subscribe_calls).push(path.to_path_buf());

        if lock(&self.rejected).contains(path) {
            return Err(WatchRegistrationError::new(
                path,
                notify::Error::generic("subscription rejected").add_path(path.to_path_buf()),
            ));
        }
        if let Some(fs) = &self.fs {
            if !fs.exists(path) {
                return Err(WatchRegistrationError::new(
                    path,
                    notify::Error::path_not_found().add_path(path.to_path_buf()),
                ));
            }
        }

        Ok(lock(&self.table).insert(path.to_path_buf(), handler))
    }

    fn unsubscribe(&self, handle: WatchHandle) -> notify::Result<bool> {
        Ok(lock(&self.table).remove(handle).is_some())
    }

    fn active_count(&self) -> usize {
        lock(&self.table).len()
    }
}
