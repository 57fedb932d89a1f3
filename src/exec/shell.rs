// src/exec/shell.rs

//! Running shell commands and capturing what they print.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Output of a finished shell command, stdout and stderr interleaved by line.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub text: String,
    pub status: ExitStatus,
}

/// Build a shell command appropriate for the platform.
pub fn shell_command(text: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(text);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(text);
        c
    }
}

/// Split off a trailing `&`, which asks for the command to run in the
/// background. Returns the command text and whether it was present.
///
/// `&&` and an escaped `\&` at the end are left to the shell.
pub fn split_background(text: &str) -> (&str, bool) {
    let trimmed = text.trim();
    match trimmed.strip_suffix('&') {
        Some(rest) if !rest.ends_with('&') && !rest.ends_with('\\') => (rest.trim_end(), true),
        _ => (trimmed, false),
    }
}

/// Run `text` through the shell and wait for it, capturing combined output.
///
/// The exit status is reported but not judged: a failing command is still a
/// completed run.
pub async fn run_shell(text: &str) -> Result<CapturedOutput> {
    info!(cmd = %text, "running shell command");

    let mut cmd = shell_command(text);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning shell for `{text}`"))?;

    let stdout = child.stdout.take().context("child stdout was not captured")?;
    let stderr = child.stderr.take().context("child stderr was not captured")?;

    let mut out_lines = BufReader::new(stdout).split(b'\n');
    let mut err_lines = BufReader::new(stderr).split(b'\n');
    let mut lines = Vec::new();
    let (mut out_done, mut err_done) = (false, false);

    // Output is decoded lossily; a read error only ends that stream, the
    // command itself keeps running to completion.
    while !(out_done && err_done) {
        tokio::select! {
            line = out_lines.next_segment(), if !out_done => match line {
                Ok(Some(raw)) => lines.push(decode_line(&raw)),
                Ok(None) => out_done = true,
                Err(err) => {
                    warn!(cmd = %text, error = %err, "stopped reading stdout");
                    out_done = true;
                }
            },
            line = err_lines.next_segment(), if !err_done => match line {
                Ok(Some(raw)) => lines.push(decode_line(&raw)),
                Ok(None) => err_done = true,
                Err(err) => {
                    warn!(cmd = %text, error = %err, "stopped reading stderr");
                    err_done = true;
                }
            },
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{text}`"))?;

    debug!(
        cmd = %text,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        lines = lines.len(),
        "shell command exited"
    );

    Ok(CapturedOutput {
        text: lines.join("\n"),
        status,
    })
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
