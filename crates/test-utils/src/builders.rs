use pausewatch::config::{ActionSection, ConfigFile, RawConfigFile, WatchSection};
use pausewatch::types::{ActionKind, FsEvent, WatchHandle};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                watch: WatchSection::default(),
                action: ActionSection::default(),
            },
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.config.watch.paths.push(path.to_string());
        self
    }

    pub fn with_action(mut self, run: &str) -> Self {
        self.config.action.run = Some(run.to_string());
        self
    }

    pub fn watch_for_creations(mut self, val: bool) -> Self {
        self.config.watch.watch_for_creations = val;
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.config.watch.recursive = val;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for an event on a made-up handle.
pub fn event(kind: ActionKind, path: &str) -> FsEvent {
    FsEvent::new(WatchHandle(0), kind, path)
}
