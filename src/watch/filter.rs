// src/watch/filter.rs

//! Decide whether a raw filesystem event should trigger the session's action.

use std::path::Path;

use crate::types::{ActionKind, FsEvent};

/// Prefix editors use for lock / swap files next to the file being edited.
pub const SWAP_FILE_PREFIX: &str = ".#";

/// Returns `true` if `event` should trigger the action.
///
/// Suppressed are: `Stopped` and `AttributeChanged` events, anything touching
/// an editor swap file, and `Created`/`Renamed` events when the session does
/// not watch for creations. There is no debouncing; every qualifying event
/// runs a full pause cycle.
pub fn should_trigger(event: &FsEvent, watch_for_creations: bool) -> bool {
    if matches!(event.kind, ActionKind::Stopped | ActionKind::AttributeChanged) {
        return false;
    }

    if is_swap_file(&event.path) {
        return false;
    }

    if !watch_for_creations && matches!(event.kind, ActionKind::Created | ActionKind::Renamed) {
        return false;
    }

    true
}

/// Whether the base name of `path` marks an editor swap file.
pub fn is_swap_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with(SWAP_FILE_PREFIX))
}
