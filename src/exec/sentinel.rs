// src/exec/sentinel.rs

//! Spotting background processes started by an action.
//!
//! While a [`ProcessSentinel`] is installed, every process started through
//! [`ActionContext::spawn_background`] reports itself to the sentinel's
//! [`ProcessObserver`] and gets an [`ExitNotifier`] attached. When the process
//! exits the notifier posts [`SessionEvent::ProcessExited`] into the owning
//! session's queue, so watch restoration happens on the session's own event
//! path, after the process's side effects are done.
//!
//! [`ActionContext::spawn_background`]: crate::exec::ActionContext::spawn_background

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::SessionEvent;
use crate::watch::backend::lock;

/// Interception scope for one pause cycle.
#[derive(Debug)]
pub struct ProcessSentinel {
    observer: ProcessObserver,
}

impl ProcessSentinel {
    pub fn install(cycle: u64, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            observer: ProcessObserver {
                inner: Arc::new(ObserverState {
                    cycle,
                    spotted: Mutex::new(Some(0)),
                    events,
                }),
            },
        }
    }

    /// The observer to hand to the action.
    pub fn observer(&self) -> ProcessObserver {
        self.observer.clone()
    }

    /// Stop intercepting and return how many processes were spotted.
    ///
    /// Processes spotted so far keep their exit notifiers.
    pub fn uninstall(self) -> usize {
        lock(&self.observer.inner.spotted).take().unwrap_or(0)
    }
}

/// What process-spawning code reports to. Cheap to clone.
#[derive(Clone)]
pub struct ProcessObserver {
    inner: Arc<ObserverState>,
}

struct ObserverState {
    cycle: u64,
    // `None` once the sentinel is uninstalled.
    spotted: Mutex<Option<usize>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl fmt::Debug for ProcessObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessObserver")
            .field("cycle", &self.inner.cycle)
            .field("spotted", &*lock(&self.inner.spotted))
            .finish()
    }
}

impl ProcessObserver {
    /// Report a freshly started process.
    ///
    /// Returns the notifier to fire once it has exited, or `None` when the
    /// sentinel has already been uninstalled.
    pub fn process_spawned(&self, pid: Option<u32>) -> Option<ExitNotifier> {
        let mut spotted = lock(&self.inner.spotted);
        let count = spotted.as_mut()?;
        *count += 1;
        debug!(cycle = self.inner.cycle, ?pid, "background process spotted");

        Some(ExitNotifier {
            cycle: self.inner.cycle,
            pid,
            events: self.inner.events.clone(),
        })
    }
}

/// Fires exactly once, after the tracked process terminated.
#[derive(Debug)]
#[must_use = "dropping the notifier leaves the session's watches paused"]
pub struct ExitNotifier {
    cycle: u64,
    pid: Option<u32>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl ExitNotifier {
    pub fn notify(self) {
        debug!(cycle = self.cycle, pid = ?self.pid, "background process exited");
        // A closed channel means the session is gone; nothing left to restore.
        let _ = self.events.send(SessionEvent::ProcessExited {
            cycle: self.cycle,
            pid: self.pid,
        });
    }
}
