use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use pausewatch::exec::ResultSink;

/// One thing a [`RecordingSink`] was asked to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Inline(String),
    Surface { title: String, body: String },
}

/// Result sink that remembers everything instead of printing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    shown: Arc<Mutex<Vec<Shown>>>,
    fail_surfaces: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose dedicated result surfaces cannot be created.
    pub fn failing_surfaces() -> Self {
        Self {
            fail_surfaces: true,
            ..Self::default()
        }
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }
}

impl ResultSink for RecordingSink {
    fn inline(&self, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push(Shown::Inline(message.to_string()));
    }

    fn show(&self, title: &str, body: &str) -> Result<()> {
        if self.fail_surfaces {
            bail!("cannot open result surface for {title}");
        }
        self.shown.lock().unwrap().push(Shown::Surface {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
