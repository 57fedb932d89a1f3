// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pausewatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "pausewatch",
    version,
    about = "Run a command when watched files change, without retriggering on its own writes.",
    long_about = None
)]
pub struct CliArgs {
    /// Files or directories to watch (default: the current directory).
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Shell command to run, given after `--`.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,

    /// Action as free text: a shell command, `:name` for a built-in command,
    /// a registered callable name, or `["prog", "arg"]`.
    ///
    /// A shell command ending in a single `&` runs in the background and the
    /// watches stay paused until it exits (`&&` and `\&` do not count).
    #[arg(short, long, value_name = "TEXT", conflicts_with = "command")]
    pub action: Option<String>,

    /// Ignore file creations and renames.
    #[arg(long)]
    pub no_creations: bool,

    /// Watch directories themselves instead of every file below them.
    #[arg(long)]
    pub no_recursive: bool,

    /// Ask for paths, action and options interactively.
    #[arg(short, long)]
    pub interactive: bool,

    /// Path to a config file (TOML).
    ///
    /// Default: `Pausewatch.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PAUSEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved watch list and action, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
