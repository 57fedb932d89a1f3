// src/types.rs

//! Core value types shared by the watch and engine layers.

use std::fmt;
use std::path::PathBuf;

/// Opaque identifier for one subscription in a [`WatchBackend`].
///
/// Handles are transient: a paused-and-restored watch gets a new handle.
///
/// [`WatchBackend`]: crate::watch::WatchBackend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchHandle(pub u64);

impl fmt::Display for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Created,
    Removed,
    Renamed,
    Changed,
    AttributeChanged,
    /// The subscription is no longer backed by an OS watch.
    Stopped,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Created,
        ActionKind::Removed,
        ActionKind::Renamed,
        ActionKind::Changed,
        ActionKind::AttributeChanged,
        ActionKind::Stopped,
    ];
}

/// A single filesystem notification as delivered to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub handle: WatchHandle,
    pub kind: ActionKind,
    pub path: PathBuf,
    /// Destination path of a rename, when known.
    pub path2: Option<PathBuf>,
}

impl FsEvent {
    pub fn new(handle: WatchHandle, kind: ActionKind, path: impl Into<PathBuf>) -> Self {
        Self {
            handle,
            kind,
            path: path.into(),
            path2: None,
        }
    }

    pub fn with_path2(mut self, path2: impl Into<PathBuf>) -> Self {
        self.path2 = Some(path2.into());
        self
    }
}
