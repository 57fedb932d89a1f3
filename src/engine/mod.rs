// src/engine/mod.rs

//! Watch-pause-reinstall engine.
//!
//! This module ties together:
//! - the per-session watch set ([`crate::watch::WatchSet`])
//! - the pause guard that takes every watch down around a triggered action
//!   and puts it back afterwards ([`guard`])
//! - the session event loop that reacts to:
//!   - filesystem events
//!   - exits of background processes started by the action
//!   - cancellation
//! - session setup from a list of user paths ([`initiator`])
//!
//! Events for one session are handled strictly one at a time, which is what
//! keeps an action's own side effects from re-triggering it.

use crate::types::FsEvent;

/// Identifies one watch session within the process.
pub type SessionId = u64;

/// Events flowing into a session from the watch backend, background
/// processes and the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A subscription of this session reported a change.
    Fs(FsEvent),
    /// A background process spotted during pause cycle `cycle` exited.
    ProcessExited { cycle: u64, pid: Option<u32> },
    /// Stop watching for good.
    CancelRequested,
}

/// Where a session is in its pause cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseState {
    /// Watches installed; events are acted on.
    Armed,
    /// Watches removed; the action is running.
    Paused,
    /// The action returned but left background processes running; watches
    /// come back when the last of them exits.
    Draining { cycle: u64, outstanding: usize },
    /// All watches removed for good.
    Cancelled,
}

pub mod guard;
pub mod initiator;
pub mod session;

pub use guard::{CycleOutcome, CycleReport, PauseGuard};
pub use initiator::Initiator;
pub use session::{SessionHandle, SessionOptions, WatchSession};
