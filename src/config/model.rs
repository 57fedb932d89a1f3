// src/config/model.rs

use serde::Deserialize;

/// Configuration file as read from TOML, before validation.
///
/// ```toml
/// [watch]
/// paths = ["src", "Cargo.toml"]
/// watch_for_creations = true
/// recursive = true
///
/// [action]
/// run = "cargo build"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub action: ActionSection,
}

/// Validated configuration. Construct via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub action: ActionSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, action: ActionSection) -> Self {
        Self { watch, action }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Files or directories to watch. Empty means the current directory.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Whether creations and renames trigger the action.
    #[serde(default = "default_true")]
    pub watch_for_creations: bool,

    /// Whether directories are expanded into per-file watches.
    #[serde(default = "default_true")]
    pub recursive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            watch_for_creations: default_true(),
            recursive: default_true(),
        }
    }
}

/// `[action]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionSection {
    /// Action text, interpreted like `--action`.
    pub run: Option<String>,
}
