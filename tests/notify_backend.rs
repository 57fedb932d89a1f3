// tests/notify_backend.rs
//
// Exercises the real OS watcher on temporary directories.
#![cfg(target_os = "linux")]

mod common;
use crate::common::{init_tracing, with_timeout, RecordingSink};

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use pausewatch::engine::{Initiator, SessionEvent, SessionOptions};
use pausewatch::exec::{ActionRegistry, ActionSpec};
use pausewatch::fs::RealFileSystem;
use pausewatch::types::{ActionKind, FsEvent};
use pausewatch::watch::{EventHandler, NotifyBackend, WatchBackend};

type TestResult = Result<(), Box<dyn Error>>;

async fn next_change(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> FsEvent {
    with_timeout(async {
        loop {
            match rx.recv().await {
                Some(SessionEvent::Fs(ev)) if ev.kind == ActionKind::Changed => break ev,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
}

#[tokio::test]
async fn change_is_delivered_to_the_subscribing_handle() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("a.txt");
    fs::write(&file, "one")?;

    let backend = NotifyBackend::new()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = backend.subscribe(&file, EventHandler::new(1, tx))?;

    fs::write(&file, "two")?;
    let event = next_change(&mut rx).await;

    assert_eq!(event.handle, handle);
    assert!(event.path.ends_with("a.txt"));
    Ok(())
}

#[tokio::test]
async fn os_watch_lives_as_long_as_one_handle_refers_to_it() -> TestResult {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("shared.txt");
    fs::write(&file, "one")?;

    let backend = NotifyBackend::new()?;
    let (tx1, _rx1) = mpsc::unbounded_channel();
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    let first = backend.subscribe(&file, EventHandler::new(1, tx1))?;
    let second = backend.subscribe(&file, EventHandler::new(2, tx2))?;
    assert_eq!(backend.active_count(), 2);

    assert!(backend.unsubscribe(first)?);
    assert_eq!(backend.active_count(), 1);

    fs::write(&file, "two")?;
    assert_eq!(next_change(&mut rx2).await.handle, second);

    assert!(backend.unsubscribe(second)?);
    assert!(!backend.unsubscribe(second)?);
    assert_eq!(backend.active_count(), 0);
    Ok(())
}

#[test]
fn missing_path_cannot_be_subscribed() -> TestResult {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope.txt");

    let backend = NotifyBackend::new()?;
    let (tx, _rx) = mpsc::unbounded_channel();
    let err = backend
        .subscribe(&missing, EventHandler::new(1, tx))
        .expect_err("subscribing a missing path must fail");

    assert_eq!(err.path, missing);
    assert_eq!(backend.active_count(), 0);
    Ok(())
}

#[tokio::test]
async fn action_rewriting_its_input_does_not_loop() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.txt");
    fs::write(&input, "start")?;
    fs::create_dir(dir.path().join("nested"))?;
    fs::write(dir.path().join("nested").join("other.txt"), "x")?;

    let runs = Arc::new(AtomicUsize::new(0));
    let mut registry = ActionRegistry::new();
    {
        let runs = Arc::clone(&runs);
        let input = input.clone();
        registry.register_callable("rewrite", move |_ctx| {
            let n = runs.fetch_add(1, Ordering::SeqCst);
            fs::write(&input, format!("rewritten {n}"))?;
            Ok(())
        });
    }

    let initiator = Initiator::new(
        Arc::new(NotifyBackend::new()?),
        Arc::new(RealFileSystem),
        Arc::new(registry),
        Arc::new(RecordingSink::new()),
    );
    let spec = ActionSpec::parse("rewrite", initiator.registry())?;
    let session = initiator.start(
        &[dir.path().to_string_lossy().into_owned()],
        spec,
        SessionOptions::default(),
    )?;

    let expected: Vec<PathBuf> = vec![dir.path().join("input.txt"), dir.path().join("nested/other.txt")];
    assert_eq!(session.watched_paths().into_iter().collect::<Vec<_>>(), expected);

    let handle = session.handle();
    let task = tokio::spawn(session.run());

    fs::write(&input, "edited")?;
    with_timeout(async {
        while runs.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    // Let any trailing events from the edit settle, then make sure the
    // action's own writes are not feeding back into the session.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let settled = runs.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(runs.load(Ordering::SeqCst), settled);

    handle.cancel();
    with_timeout(task).await??;
    Ok(())
}
