// tests/logging_filter.rs

use pausewatch::cli::LogLevel;
use pausewatch::logging::build_filter;

#[test]
fn cli_level_wins_over_env() {
    let filter = build_filter(Some(LogLevel::Warn), Some("trace"));
    assert_eq!(filter.to_string(), "warn");
}

#[test]
fn env_accepts_bare_levels_and_directives() {
    assert_eq!(build_filter(None, Some("Warning")).to_string(), "warn");
    assert_eq!(
        build_filter(None, Some("pausewatch=debug")).to_string(),
        "pausewatch=debug"
    );
}

#[test]
fn falls_back_to_info() {
    assert_eq!(build_filter(None, None).to_string(), "info");
    assert_eq!(build_filter(None, Some("  ")).to_string(), "info");
}
