// tests/action_spec.rs

use pausewatch::errors::PausewatchError;
use pausewatch::exec::{ActionRegistry, ActionSpec};

fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::with_builtins();
    registry.register_callable("rebuild", |_ctx| Ok(()));
    registry
}

fn parse(text: &str) -> ActionSpec {
    ActionSpec::parse(text, &registry()).unwrap_or_else(|e| panic!("{text:?}: {e}"))
}

fn shell_text(spec: ActionSpec) -> String {
    match spec {
        ActionSpec::Shell(text) => text,
        other => panic!("Expected a shell action, got: {:?}", other),
    }
}

#[test]
fn registered_symbol_is_a_callable() {
    match parse("rebuild") {
        ActionSpec::Callable(action) => assert_eq!(action.name(), "rebuild"),
        other => panic!("Expected Callable, got: {:?}", other),
    }
    assert!(matches!(parse("log-event"), ActionSpec::Callable(_)));
}

#[test]
fn unknown_symbol_falls_back_to_shell() {
    assert_eq!(shell_text(parse("make")), "make");
    assert_eq!(shell_text(parse("  cargo test --all  ")), "cargo test --all");
}

#[test]
fn colon_prefix_names_an_interactive_command() {
    match parse(":clear") {
        ActionSpec::Interactive(name) => assert_eq!(name, "clear"),
        other => panic!("Expected Interactive, got: {:?}", other),
    }
    assert_eq!(parse(":bell").describe(), ":bell");
}

#[test]
fn unknown_interactive_command_is_invalid() {
    let err = ActionSpec::parse(":reticulate", &registry()).expect_err("must be rejected");
    match err {
        PausewatchError::InvalidActionSpec(msg) => assert!(msg.contains("reticulate")),
        other => panic!("Expected InvalidActionSpec, got: {:?}", other),
    }
}

#[test]
fn structured_argv_is_quoted_into_a_shell_command() {
    assert_eq!(
        shell_text(parse(r#"["grep", "-r", "two words", "it's"]"#)),
        r#"grep -r 'two words' 'it'\''s'"#
    );
}

#[test]
fn quoted_string_is_a_shell_command_even_when_it_names_a_callable() {
    assert_eq!(shell_text(parse(r#""rebuild""#)), "rebuild");
    assert_eq!(shell_text(parse(r#""echo \"hi\"""#)), r#"echo "hi""#);
}

#[test]
fn empty_and_malformed_actions_are_invalid() {
    let registry = registry();
    for text in ["", "   ", "[]", "[1, 2]", r#"["unterminated"#, r#""""#, "&", "  &  "] {
        match ActionSpec::parse(text, &registry) {
            Err(PausewatchError::InvalidActionSpec(_)) => {}
            other => panic!("{text:?}: expected InvalidActionSpec, got: {:?}", other),
        }
    }
}

#[test]
fn double_ampersand_is_not_a_background_marker() {
    assert_eq!(shell_text(parse("make &&")), "make &&");
    assert_eq!(shell_text(parse("serve &")), "serve &");
}

#[test]
fn describe_names_the_action() {
    assert_eq!(parse("rebuild").describe(), "rebuild");
    assert_eq!(parse("echo hi").describe(), "echo hi");
}

#[test]
fn builtins_are_listed() {
    let registry = ActionRegistry::with_builtins();
    assert_eq!(registry.callable_names().collect::<Vec<_>>(), vec!["log-event"]);
    assert_eq!(registry.command_names().collect::<Vec<_>>(), vec!["bell", "clear"]);
}
