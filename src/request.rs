// src/request.rs

//! What the user asked for, merged from the CLI, the config file and
//! interactive prompts.

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::engine::SessionOptions;
use crate::errors::{PausewatchError, Result};
use crate::exec::{ActionRegistry, ActionSpec};

/// How the action was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSource {
    /// Free text, interpreted by [`ActionSpec::parse`].
    Text(String),
    /// Always a shell command (the words after `--`).
    Shell(String),
}

/// A complete watch request, ready for [`crate::engine::Initiator::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRequest {
    pub paths: Vec<String>,
    pub action: ActionSource,
    pub watch_for_creations: bool,
    pub recursive: bool,
}

impl WatchRequest {
    /// Merge CLI arguments over the (optional) config file.
    pub fn from_sources(args: &CliArgs, config: Option<&ConfigFile>) -> Result<Self> {
        let action = if !args.command.is_empty() {
            ActionSource::Shell(args.command.join(" "))
        } else if let Some(text) = &args.action {
            ActionSource::Text(text.clone())
        } else if let Some(text) = config.and_then(|c| c.action.run.clone()) {
            ActionSource::Text(text)
        } else {
            return Err(PausewatchError::ConfigError(
                "no action given: pass `-- COMMAND`, `--action TEXT` or set [action].run"
                    .to_string(),
            ));
        };

        let paths = if args.paths.is_empty() {
            config.map(|c| c.watch.paths.clone()).unwrap_or_default()
        } else {
            args.paths.clone()
        };

        let (cfg_creations, cfg_recursive) = config
            .map(|c| (c.watch.watch_for_creations, c.watch.recursive))
            .unwrap_or((true, true));

        Ok(Self {
            paths,
            action,
            watch_for_creations: cfg_creations && !args.no_creations,
            recursive: cfg_recursive && !args.no_recursive,
        })
    }

    pub fn options(&self) -> SessionOptions {
        SessionOptions {
            watch_for_creations: self.watch_for_creations,
            recursive: self.recursive,
        }
    }

    pub fn action_spec(&self, registry: &ActionRegistry) -> Result<ActionSpec> {
        match &self.action {
            ActionSource::Text(text) => ActionSpec::parse(text, registry),
            ActionSource::Shell(text) => ActionSpec::shell(text.clone()),
        }
    }
}
