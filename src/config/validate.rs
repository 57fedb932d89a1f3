// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PausewatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PausewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.action))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_action(cfg)?;
    validate_paths(cfg)?;
    Ok(())
}

fn validate_action(cfg: &RawConfigFile) -> Result<()> {
    if let Some(run) = &cfg.action.run {
        if run.trim().is_empty() {
            return Err(PausewatchError::ConfigError(
                "[action].run must not be blank (omit it to pass the action on the command line)"
                    .to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    if let Some(bad) = cfg.watch.paths.iter().find(|p| p.contains('\0')) {
        return Err(PausewatchError::ConfigError(format!(
            "[watch].paths entry {bad:?} contains a NUL byte"
        )));
    }
    Ok(())
}
