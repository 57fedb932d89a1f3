// src/watch/watcher.rs

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::errors::WatchRegistrationError;
use crate::types::{ActionKind, WatchHandle};
use crate::watch::backend::{lock, SubscriptionTable, WatchBackend};
use crate::watch::EventHandler;

/// [`WatchBackend`] on top of the platform's recommended `notify` watcher.
///
/// Every path is watched non-recursively; recursive sessions expand
/// directories into per-file subscriptions before they get here.
pub struct NotifyBackend {
    table: Arc<Mutex<SubscriptionTable>>,
    // Serialises watch/unwatch calls against the table's reference counts.
    // The notify callback only ever takes `table`, never this lock.
    watcher: Mutex<RecommendedWatcher>,
}

impl fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBackend")
            .field("subscriptions", &lock(&self.table).len())
            .finish()
    }
}

impl NotifyBackend {
    pub fn new() -> notify::Result<Self> {
        let table = Arc::new(Mutex::new(SubscriptionTable::new()));

        // Closure called synchronously by notify whenever an event arrives.
        let watcher = RecommendedWatcher::new(
            {
                let table = Arc::clone(&table);
                move |res: notify::Result<Event>| match res {
                    Ok(event) => forward_event(&table, event),
                    Err(err) => forward_error(&table, err),
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            table,
            watcher: Mutex::new(watcher),
        })
    }
}

impl WatchBackend for NotifyBackend {
    fn subscribe(
        &self,
        path: &Path,
        handler: EventHandler,
    ) -> Result<WatchHandle, WatchRegistrationError> {
        let canonical = path.canonicalize().map_err(|e| {
            WatchRegistrationError::new(path, notify::Error::io(e).add_path(path.to_path_buf()))
        })?;

        let mut watcher = lock(&self.watcher);
        let already_watched = lock(&self.table).is_watched(&canonical);
        if !already_watched {
            watcher
                .watch(&canonical, RecursiveMode::NonRecursive)
                .map_err(|e| WatchRegistrationError::new(path, e))?;
        }

        let handle = lock(&self.table).insert(canonical, handler);
        debug!(%handle, ?path, shared = already_watched, "subscribed");
        Ok(handle)
    }

    fn unsubscribe(&self, handle: WatchHandle) -> notify::Result<bool> {
        let mut watcher = lock(&self.watcher);
        let removed = lock(&self.table).remove(handle);

        match removed {
            None => Ok(false),
            Some((path, last)) => {
                debug!(%handle, ?path, released = last, "unsubscribed");
                if last {
                    watcher.unwatch(&path)?;
                }
                Ok(true)
            }
        }
    }

    fn active_count(&self) -> usize {
        lock(&self.table).len()
    }
}

/// Translate a notify event kind. `None` means the event is not interesting
/// to anyone (pure reads, opaque backend noise).
pub fn map_event_kind(kind: &EventKind) -> Option<ActionKind> {
    match kind {
        EventKind::Create(_) => Some(ActionKind::Created),
        EventKind::Remove(_) => Some(ActionKind::Removed),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ActionKind::Renamed),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(ActionKind::AttributeChanged),
        EventKind::Modify(_) | EventKind::Any => Some(ActionKind::Changed),
        EventKind::Access(_) | EventKind::Other => None,
    }
}

fn forward_event(table: &Mutex<SubscriptionTable>, event: Event) {
    let Some(kind) = map_event_kind(&event.kind) else {
        return;
    };

    let table = lock(table);

    if let (EventKind::Modify(ModifyKind::Name(RenameMode::Both)), [from, to]) =
        (&event.kind, event.paths.as_slice())
    {
        table.dispatch(kind, from, Some(to));
        return;
    }

    for path in &event.paths {
        table.dispatch(kind, path, None);
        // The OS drops a watch whose target disappears.
        if kind == ActionKind::Removed && table.is_watched(path) {
            table.dispatch_stopped(path);
        }
    }
}

fn forward_error(table: &Mutex<SubscriptionTable>, err: notify::Error) {
    warn!(error = %err, paths = ?err.paths, "file watch error");

    let table = lock(table);
    for path in &err.paths {
        table.dispatch_stopped(path);
    }
}
