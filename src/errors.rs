// src/errors.rs

//! Crate-wide error types.

use std::path::PathBuf;

use thiserror::Error;

/// A single subscription could not be registered with the watch backend.
#[derive(Error, Debug)]
#[error("cannot watch {path:?}: {source}")]
pub struct WatchRegistrationError {
    pub path: PathBuf,
    #[source]
    pub source: notify::Error,
}

impl WatchRegistrationError {
    pub fn new(path: impl Into<PathBuf>, source: notify::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum PausewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    WatchRegistration(#[from] WatchRegistrationError),

    /// Setting up a session failed; every watch created so far was removed.
    #[error("watch setup failed: {0}")]
    WatchSetup(#[source] WatchRegistrationError),

    #[error("action '{action}' failed: {source}")]
    ActionExecution {
        action: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("invalid action: {0}")]
    InvalidActionSpec(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PausewatchError {
    pub fn action_failed(action: impl Into<String>, err: anyhow::Error) -> Self {
        PausewatchError::ActionExecution {
            action: action.into(),
            source: err.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PausewatchError>;
