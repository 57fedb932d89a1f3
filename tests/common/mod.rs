// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use pausewatch_test_utils::builders;
pub use pausewatch_test_utils::harness::TestEnv;
pub use pausewatch_test_utils::prompter::{Answer, ScriptedPrompter};
pub use pausewatch_test_utils::sink::{RecordingSink, Shown};
pub use pausewatch_test_utils::{init_tracing, with_timeout};

use pausewatch::exec::ActionRegistry;

/// A registry with one callable, `count`, that bumps the returned counter.
pub fn counting_registry() -> (ActionRegistry, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut registry = ActionRegistry::new();
    let c = Arc::clone(&counter);
    registry.register_callable("count", move |_ctx| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    (registry, counter)
}
