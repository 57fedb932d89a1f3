// src/watch/backend.rs

//! The file-event subsystem seam.
//!
//! A [`WatchBackend`] hands out one [`WatchHandle`] per `subscribe` call and
//! delivers events for that subscription to its [`EventHandler`]. Backends are
//! shared between sessions (`Arc<dyn WatchBackend>`), so the bookkeeping lives
//! in a [`SubscriptionTable`] that reference-counts paths: the OS watch for a
//! path exists exactly as long as at least one handle refers to it.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::WatchRegistrationError;
use crate::types::{ActionKind, FsEvent, WatchHandle};
use crate::watch::EventHandler;

/// Subscribe/unsubscribe API of the filesystem-event subsystem.
pub trait WatchBackend: Send + Sync + Debug {
    /// Register one subscription for `path`.
    ///
    /// Fails if the path does not exist or the subsystem refuses it (for
    /// example when the OS watch limit is exhausted).
    fn subscribe(
        &self,
        path: &Path,
        handler: EventHandler,
    ) -> Result<WatchHandle, WatchRegistrationError>;

    /// Remove a subscription. Returns `Ok(false)` for an unknown handle.
    ///
    /// The handle is forgotten even when releasing the OS watch fails.
    fn unsubscribe(&self, handle: WatchHandle) -> notify::Result<bool>;

    /// Number of live subscriptions across all sessions.
    fn active_count(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub path: PathBuf,
    pub handler: EventHandler,
}

/// Handle table shared by everything registered with one backend.
#[derive(Debug)]
pub struct SubscriptionTable {
    next_id: u64,
    by_handle: HashMap<WatchHandle, Subscription>,
    by_path: HashMap<PathBuf, Vec<WatchHandle>>,
}

impl Default for SubscriptionTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            by_handle: HashMap::new(),
            by_path: HashMap::new(),
        }
    }
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one subscription refers to `path`.
    pub fn is_watched(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    /// Record a new subscription and return its freshly minted handle.
    pub fn insert(&mut self, path: PathBuf, handler: EventHandler) -> WatchHandle {
        let handle = WatchHandle(self.next_id);
        self.next_id += 1;

        self.by_path.entry(path.clone()).or_default().push(handle);
        self.by_handle.insert(handle, Subscription { path, handler });
        handle
    }

    /// Forget a subscription.
    ///
    /// Returns the subscribed path and whether this was the last handle on
    /// it (i.e. the OS watch should be released).
    pub fn remove(&mut self, handle: WatchHandle) -> Option<(PathBuf, bool)> {
        let sub = self.by_handle.remove(&handle)?;

        let last = match self.by_path.get_mut(&sub.path) {
            Some(handles) => {
                handles.retain(|h| *h != handle);
                handles.is_empty()
            }
            None => true,
        };
        if last {
            self.by_path.remove(&sub.path);
        }

        Some((sub.path, last))
    }

    /// Every subscribed path, once per handle, sorted.
    pub fn subscribed_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.by_handle.values().map(|s| s.path.clone()).collect();
        paths.sort();
        paths
    }

    fn handles_on(&self, path: &Path) -> impl Iterator<Item = WatchHandle> + '_ {
        self.by_path.get(path).into_iter().flatten().copied()
    }

    /// Deliver an event for `path` to the subscriptions on `path` itself and
    /// on its parent directory. Returns the number of deliveries.
    pub fn dispatch(&self, kind: ActionKind, path: &Path, path2: Option<&Path>) -> usize {
        let mut targets: Vec<WatchHandle> = self.handles_on(path).collect();
        if let Some(parent) = path.parent() {
            if parent != path {
                targets.extend(self.handles_on(parent));
            }
        }
        if let Some(path2) = path2 {
            targets.extend(self.handles_on(path2));
            if let Some(parent) = path2.parent() {
                targets.extend(self.handles_on(parent));
            }
        }
        targets.sort();
        targets.dedup();

        self.deliver_to(&targets, kind, path, path2)
    }

    /// Tell the subscriptions on exactly `path` that their OS watch is gone.
    pub fn dispatch_stopped(&self, path: &Path) -> usize {
        let targets: Vec<WatchHandle> = self.handles_on(path).collect();
        self.deliver_to(&targets, ActionKind::Stopped, path, None)
    }

    fn deliver_to(
        &self,
        targets: &[WatchHandle],
        kind: ActionKind,
        path: &Path,
        path2: Option<&Path>,
    ) -> usize {
        let mut delivered = 0;
        for handle in targets {
            let Some(sub) = self.by_handle.get(handle) else {
                continue;
            };
            let mut event = FsEvent::new(*handle, kind, path);
            if let Some(path2) = path2 {
                event = event.with_path2(path2);
            }
            if sub.handler.deliver(event) {
                delivered += 1;
            }
        }
        delivered
    }
}

/// Lock a backend mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
