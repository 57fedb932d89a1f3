// src/exec/display.rs

//! Where command output ends up.

use std::fmt::Debug;
use std::io::Write;

use anyhow::Result;

/// Output longer than this many lines gets its own result block.
pub const INLINE_OUTPUT_MAX_LINES: usize = 10;

/// Result-display surface.
pub trait ResultSink: Send + Sync + Debug {
    /// Short message shown in the normal output flow.
    fn inline(&self, message: &str);

    /// Open a fresh, dedicated surface titled `title` showing `body`.
    fn show(&self, title: &str, body: &str) -> Result<()>;
}

/// Writes results to stdout (logs go to stderr).
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn inline(&self, message: &str) {
        println!("[pausewatch] {message}");
    }

    fn show(&self, title: &str, body: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "---- {title} ----")?;
        writeln!(out, "{body}")?;
        writeln!(out, "---- end of {title} ----")?;
        out.flush()?;
        Ok(())
    }
}

/// Show captured command output: inline when short, in its own block when it
/// exceeds [`INLINE_OUTPUT_MAX_LINES`].
pub fn present_output(sink: &dyn ResultSink, command: &str, output: &str) -> Result<()> {
    let text = output.trim_end();

    if text.is_empty() {
        sink.inline(&format!("`{command}` finished with no output"));
    } else if text.lines().count() > INLINE_OUTPUT_MAX_LINES {
        sink.show(command, text)?;
    } else {
        sink.inline(text);
    }

    Ok(())
}
