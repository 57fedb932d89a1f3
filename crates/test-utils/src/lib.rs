//! Shared helpers for the `pausewatch` integration tests: an in-memory
//! session environment, a recording result sink, scripted prompts and
//! config builders.

pub mod builders;
pub mod harness;
pub mod prompter;
pub mod sink;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for anything a test awaits (background processes, OS events).
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route session logs into the test harness's captured output.
///
/// `RUST_LOG=pausewatch=debug` shows the pause/restore flow of a failing test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pausewatch=info"));

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(output) => output,
        Err(_) => panic!("still waiting after {TEST_TIMEOUT:?}"),
    }
}
