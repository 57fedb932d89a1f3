// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Talking to the OS file-event subsystem (`notify`) through the
//!   [`WatchBackend`] seam, so several sessions can share one watcher.
//! - Owning the per-session set of live subscriptions ([`WatchSet`]) and
//!   tearing it down / rebuilding it around a triggered action.
//! - Deciding which raw events are worth acting on ([`filter`]).
//!
//! It does **not** run actions; that is the job of [`crate::engine`].

pub mod backend;
pub mod filter;
pub mod mock;
pub mod path_utils;
pub mod set;
pub mod watcher;

use std::fmt;
use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::engine::{SessionEvent, SessionId};
use crate::types::FsEvent;

pub use backend::{SubscriptionTable, WatchBackend};
pub use filter::{is_swap_file, should_trigger};
pub use mock::ManualBackend;
pub use set::WatchSet;
pub use watcher::NotifyBackend;

/// Where a subscription's events go: the owning session's event channel.
#[derive(Clone)]
pub struct EventHandler {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventHandler {
    pub fn new(session: SessionId, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Forward an event to the session. Returns `false` once the session is
    /// gone.
    pub fn deliver(&self, event: FsEvent) -> bool {
        self.tx.send(SessionEvent::Fs(event)).is_ok()
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// The durable half of a subscription: enough to recreate it after a pause.
#[derive(Debug, Clone)]
pub struct WatchDescriptor {
    pub path: PathBuf,
    pub handler: EventHandler,
}
