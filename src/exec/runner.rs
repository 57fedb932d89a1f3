// src/exec/runner.rs

//! Dispatch of an [`ActionSpec`] to whatever actually performs it.

use std::io;
use std::process::{Output, Stdio};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::errors::{PausewatchError, Result};
use crate::exec::action::{ActionRegistry, ActionSpec};
use crate::exec::context::{ActionContext, ExitHook};
use crate::exec::display::present_output;
use crate::exec::shell::{run_shell, shell_command, split_background};

#[derive(Debug, Clone)]
pub struct ActionRunner {
    registry: Arc<ActionRegistry>,
}

impl ActionRunner {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Run `spec` once.
    ///
    /// Returns when the top-level action returns; background processes it
    /// started may still be running.
    pub async fn run(&self, spec: &ActionSpec, ctx: &ActionContext) -> Result<()> {
        match spec {
            ActionSpec::Shell(text) => match split_background(text) {
                (command, true) => self.spawn_shell(command, ctx),
                (command, false) => {
                    let output = run_shell(command).await?;
                    present_output(ctx.sink(), command, &output.text)?;
                    Ok(())
                }
            },
            ActionSpec::Callable(action) => action
                .call(ctx)
                .map_err(|e| PausewatchError::action_failed(action.name(), e)),
            ActionSpec::Interactive(name) => self.registry.invoke_command(name, ctx),
        }
    }

    /// `cmd &`: start the shell without waiting; show its output on exit.
    fn spawn_shell(&self, command: &str, ctx: &ActionContext) -> Result<()> {
        let mut cmd = shell_command(command);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let sink = ctx.sink_arc();
        let label = command.to_string();
        let on_exit: ExitHook = Box::new(move |result: io::Result<Output>| match result {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                if let Err(err) = present_output(sink.as_ref(), &label, &text) {
                    warn!(cmd = %label, error = %err, "failed to display background output");
                }
            }
            Err(err) => {
                warn!(cmd = %label, error = %err, "failed to collect background output");
            }
        });

        let pid = ctx
            .spawn_background(cmd, Some(on_exit))
            .with_context(|| format!("spawning background shell for `{command}`"))?;

        info!(cmd = %command, ?pid, "started background shell command");
        Ok(())
    }
}
