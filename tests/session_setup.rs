// tests/session_setup.rs

mod common;
use crate::common::{counting_registry, TestEnv};

use std::collections::BTreeSet;
use std::path::PathBuf;

use pausewatch::engine::{PauseState, SessionOptions};
use pausewatch::errors::PausewatchError;
use pausewatch::exec::{ActionRegistry, ActionSpec};
use pausewatch::watch::WatchBackend;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn count_action(registry: &ActionRegistry) -> ActionSpec {
    ActionSpec::parse("count", registry).expect("count is registered")
}

#[test]
fn failed_setup_removes_every_watch_it_created() {
    let env = TestEnv::with_files(&["./a.txt", "./b.txt", "./c.txt"]);
    env.backend.reject("./b.txt");
    let (registry, _) = counting_registry();
    let action = count_action(&registry);
    let initiator = env.initiator(registry);

    let result = initiator.start(
        &strings(&["./a.txt", "./b.txt", "./c.txt"]),
        action,
        SessionOptions::default(),
    );

    match result {
        Err(PausewatchError::WatchSetup(err)) => {
            assert_eq!(err.path, PathBuf::from("./b.txt"));
        }
        Err(e) => panic!("Expected WatchSetup error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert_eq!(env.backend.active_count(), 0);
    // Setup stops at the failing path.
    assert_eq!(
        env.backend.subscribe_calls(),
        vec![PathBuf::from("./a.txt"), PathBuf::from("./b.txt")]
    );
}

#[test]
fn failure_inside_a_recursive_root_rolls_back_earlier_roots_too() {
    let env = TestEnv::with_files(&["./README.md", "./src/x.rs", "./src/y.rs"]);
    env.backend.reject("./src/y.rs");
    let (registry, _) = counting_registry();
    let action = count_action(&registry);
    let initiator = env.initiator(registry);

    let err = initiator
        .start(
            &strings(&["./README.md", "./src"]),
            action,
            SessionOptions::default(),
        )
        .expect_err("setup must fail");

    assert!(matches!(err, PausewatchError::WatchSetup(_)));
    assert_eq!(env.backend.active_count(), 0);
}

#[test]
fn missing_path_fails_setup() {
    let env = TestEnv::with_files(&["./present.txt"]);
    let (registry, _) = counting_registry();
    let action = count_action(&registry);
    let initiator = env.initiator(registry);

    let err = initiator
        .start(
            &strings(&["./present.txt", "./missing.txt"]),
            action,
            SessionOptions::default(),
        )
        .expect_err("missing path must fail");

    match err {
        PausewatchError::WatchSetup(e) => assert_eq!(e.path, PathBuf::from("./missing.txt")),
        other => panic!("Expected WatchSetup error, got: {:?}", other),
    }
    assert_eq!(env.backend.active_count(), 0);
}

#[test]
fn empty_or_blank_paths_watch_the_default_directory() {
    let env = TestEnv::with_files(&["./one.txt", "./sub/two.txt"]);
    let (registry, _) = counting_registry();
    let action = count_action(&registry);
    let initiator = env.initiator(registry);
    let expected: BTreeSet<PathBuf> = [PathBuf::from("./one.txt"), PathBuf::from("./sub/two.txt")]
        .into_iter()
        .collect();

    for paths in [strings(&[]), strings(&["", "   "]), strings(&["."])] {
        let mut session = initiator
            .start(&paths, action.clone(), SessionOptions::default())
            .expect("session starts");
        assert_eq!(session.watched_paths(), expected, "paths = {paths:?}");
        assert_eq!(session.state(), PauseState::Armed);
        session.cancel();
    }
    assert_eq!(env.backend.active_count(), 0);
}

#[test]
fn non_recursive_session_watches_directories_themselves() {
    let env = TestEnv::with_files(&["./src/a.rs", "./src/b.rs"]);
    let (registry, _) = counting_registry();
    let action = count_action(&registry);
    let initiator = env.initiator(registry);

    let options = SessionOptions {
        watch_for_creations: true,
        recursive: false,
    };
    let session = initiator
        .start(&strings(&["./src"]), action, options)
        .expect("session starts");

    assert_eq!(
        session.watched_paths().into_iter().collect::<Vec<_>>(),
        vec![PathBuf::from("./src")]
    );
    assert_eq!(session.options(), options);
}

#[test]
fn invalid_action_is_rejected_before_any_watch_is_installed() {
    let env = TestEnv::with_files(&["./a.txt"]);
    let initiator = env.initiator(ActionRegistry::new());

    let err = initiator
        .start(
            &strings(&["./a.txt"]),
            ActionSpec::Interactive("nope".to_string()),
            SessionOptions::default(),
        )
        .expect_err("unknown command must be rejected");

    assert!(matches!(err, PausewatchError::InvalidActionSpec(_)));
    assert!(env.backend.subscribe_calls().is_empty());
}

#[test]
fn sessions_get_distinct_ids_and_share_the_backend() {
    let env = TestEnv::with_files(&["./a.txt"]);
    let (registry, _) = counting_registry();
    let action = count_action(&registry);
    let initiator = env.initiator(registry);

    let mut first = initiator
        .start(&strings(&["./a.txt"]), action.clone(), SessionOptions::default())
        .expect("first session");
    let second = initiator
        .start(&strings(&["./a.txt"]), action, SessionOptions::default())
        .expect("second session");

    assert_ne!(first.id(), second.id());
    assert_eq!(env.backend.active_count(), 2);

    first.cancel();
    assert_eq!(env.backend.active_count(), 1);
    assert_eq!(second.active_watch_count(), 1);
}
