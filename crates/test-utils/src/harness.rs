use std::sync::Arc;

use pausewatch::engine::Initiator;
use pausewatch::exec::ActionRegistry;
use pausewatch::fs::mock::MockFileSystem;
use pausewatch::watch::ManualBackend;

use crate::sink::RecordingSink;

/// In-memory collaborators for driving sessions without touching the OS.
///
/// The mock filesystem is rooted at `.`, which is also the initiator's
/// default directory.
pub struct TestEnv {
    pub fs: MockFileSystem,
    pub backend: Arc<ManualBackend>,
    pub sink: RecordingSink,
}

impl TestEnv {
    /// `files` are added to the mock filesystem (use `./`-prefixed paths).
    pub fn with_files(files: &[&str]) -> Self {
        let fs = MockFileSystem::new();
        for file in files {
            fs.add_file(file);
        }
        let backend = Arc::new(ManualBackend::with_filesystem(Arc::new(fs.clone())));

        Self {
            fs,
            backend,
            sink: RecordingSink::new(),
        }
    }

    pub fn initiator(&self, registry: ActionRegistry) -> Initiator {
        Initiator::new(
            self.backend.clone(),
            Arc::new(self.fs.clone()),
            Arc::new(registry),
            Arc::new(self.sink.clone()),
        )
        .with_default_dir(".")
    }
}
