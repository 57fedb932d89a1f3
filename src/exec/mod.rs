// src/exec/mod.rs

//! Action execution layer.
//!
//! This module is responsible for actually performing a session's action,
//! using `tokio::process::Command` for anything that runs through the shell.
//!
//! - [`action`] defines [`ActionSpec`] and the registry of named actions.
//! - [`runner`] dispatches an `ActionSpec` to the shell, a callable or an
//!   interactive command.
//! - [`shell`] runs shell commands and captures their combined output.
//! - [`display`] decides where that output is shown.
//! - [`context`] is what an action sees, including the one primitive for
//!   leaving a process running in the background.
//! - [`sentinel`] notices such background processes so the session can keep
//!   its watches paused until they are done.

pub mod action;
pub mod context;
pub mod display;
pub mod runner;
pub mod sentinel;
pub mod shell;

pub use action::{ActionRegistry, ActionSpec, NativeAction};
pub use context::{ActionContext, ExitHook};
pub use display::{present_output, ConsoleSink, ResultSink, INLINE_OUTPUT_MAX_LINES};
pub use runner::ActionRunner;
pub use sentinel::{ExitNotifier, ProcessObserver, ProcessSentinel};
pub use shell::{run_shell, CapturedOutput};
