// src/watch/path_utils.rs

//! Utility functions for turning user-supplied paths into watch targets.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::fs::FileSystem;

/// Normalise the user's path list.
///
/// Blank entries are dropped; if nothing is left, `default_dir` is used.
pub fn resolve_paths(paths: &[String], default_dir: &Path) -> Vec<PathBuf> {
    let resolved: Vec<PathBuf> = paths
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();

    if resolved.is_empty() {
        vec![default_dir.to_path_buf()]
    } else {
        resolved
    }
}

/// Every file reachable below `root`, sorted.
///
/// No depth limit and no symlink-loop protection: the tree is walked exactly
/// as `read_dir` reports it. Directories themselves are not included.
pub fn files_under(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs.read_dir(&dir)? {
            if fs.is_dir(&entry) {
                pending.push(entry);
            } else {
                files.push(entry);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// The concrete paths a watch on `root` turns into.
///
/// A directory in recursive mode expands to all files below it; anything
/// else is watched as-is.
pub fn watch_targets(fs: &dyn FileSystem, root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if recursive && fs.is_dir(root) {
        files_under(fs, root)
    } else {
        Ok(vec![root.to_path_buf()])
    }
}
