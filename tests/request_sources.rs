// tests/request_sources.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::{Answer, ScriptedPrompter};

use clap::Parser;

use pausewatch::cli::CliArgs;
use pausewatch::engine::SessionOptions;
use pausewatch::errors::PausewatchError;
use pausewatch::exec::{ActionRegistry, ActionSpec};
use pausewatch::prompt::collect_request;
use pausewatch::request::{ActionSource, WatchRequest};

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("pausewatch").chain(argv.iter().copied()))
        .unwrap_or_else(|e| panic!("{argv:?}: {e}"))
}

#[test]
fn words_after_double_dash_are_a_shell_command() {
    let cli = args(&["src", "docs", "--", "make", "-j4"]);

    let request = WatchRequest::from_sources(&cli, None).unwrap();

    assert_eq!(request.paths, vec!["src", "docs"]);
    assert_eq!(request.action, ActionSource::Shell("make -j4".to_string()));
    assert_eq!(request.options(), SessionOptions::default());
}

#[test]
fn shell_source_never_resolves_to_a_callable() {
    let cli = args(&["--", "log-event"]);
    let request = WatchRequest::from_sources(&cli, None).unwrap();

    let spec = request.action_spec(&ActionRegistry::with_builtins()).unwrap();
    assert!(matches!(spec, ActionSpec::Shell(text) if text == "log-event"));
}

#[test]
fn action_flag_is_parsed_as_free_text() {
    let cli = args(&["-a", ":bell", "--no-creations"]);
    let request = WatchRequest::from_sources(&cli, None).unwrap();

    let spec = request.action_spec(&ActionRegistry::with_builtins()).unwrap();
    assert!(matches!(spec, ActionSpec::Interactive(name) if name == "bell"));
    assert!(!request.watch_for_creations);
    assert!(request.recursive);
}

#[test]
fn action_flag_and_command_conflict() {
    let result = CliArgs::try_parse_from(["pausewatch", "-a", "make", "--", "make"]);
    assert!(result.is_err());
}

#[test]
fn config_fills_in_what_the_command_line_leaves_out() {
    let cfg = ConfigFileBuilder::new()
        .with_path("lib")
        .with_action("cargo test")
        .recursive(false)
        .build();

    let request = WatchRequest::from_sources(&args(&[]), Some(&cfg)).unwrap();

    assert_eq!(request.paths, vec!["lib"]);
    assert_eq!(request.action, ActionSource::Text("cargo test".to_string()));
    assert!(request.watch_for_creations);
    assert!(!request.recursive);
}

#[test]
fn command_line_overrides_config() {
    let cfg = ConfigFileBuilder::new()
        .with_path("lib")
        .with_action("cargo test")
        .build();

    let request =
        WatchRequest::from_sources(&args(&["src", "--no-recursive", "--", "make"]), Some(&cfg))
            .unwrap();

    assert_eq!(request.paths, vec!["src"]);
    assert_eq!(request.action, ActionSource::Shell("make".to_string()));
    assert!(!request.recursive);
}

#[test]
fn missing_action_returns_config_error() {
    let cfg = ConfigFileBuilder::new().with_path("src").build();

    match WatchRequest::from_sources(&args(&["src"]), Some(&cfg)) {
        Err(PausewatchError::ConfigError(msg)) => assert!(msg.contains("no action")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn prompts_collect_paths_until_an_empty_answer() {
    let mut prompter = ScriptedPrompter::new([
        Answer::Text("src".to_string()),
        Answer::Text("tests".to_string()),
        Answer::Text("  ".to_string()),
        Answer::Text("cargo test".to_string()),
        Answer::Confirm(false),
        Answer::Confirm(true),
    ]);

    let request = collect_request(&mut prompter).unwrap();

    assert_eq!(
        request,
        WatchRequest {
            paths: vec!["src".to_string(), "tests".to_string()],
            action: ActionSource::Text("cargo test".to_string()),
            watch_for_creations: false,
            recursive: true,
        }
    );
    assert_eq!(prompter.prompts.len(), 6);
}

#[test]
fn prompts_allow_no_paths_at_all() {
    let mut prompter = ScriptedPrompter::new([
        Answer::Text(String::new()),
        Answer::Text(":clear".to_string()),
        Answer::Confirm(true),
        Answer::Confirm(true),
    ]);

    let request = collect_request(&mut prompter).unwrap();

    assert!(request.paths.is_empty());
    let spec = request.action_spec(&ActionRegistry::with_builtins()).unwrap();
    assert!(matches!(spec, ActionSpec::Interactive(_)));
}
