// src/exec/context.rs

use std::io;
use std::process::Output;
use std::sync::Arc;

use tokio::process::Command;
use tracing::debug;

use crate::exec::display::ResultSink;
use crate::exec::sentinel::ProcessObserver;
use crate::types::FsEvent;

/// Called with the process's result once it has exited.
pub type ExitHook = Box<dyn FnOnce(io::Result<Output>) + Send + 'static>;

/// Everything an action gets to see while it runs.
pub struct ActionContext {
    trigger: Option<FsEvent>,
    observer: Option<ProcessObserver>,
    sink: Arc<dyn ResultSink>,
}

impl ActionContext {
    pub fn new(trigger: Option<FsEvent>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            trigger,
            observer: None,
            sink,
        }
    }

    pub fn with_observer(mut self, observer: ProcessObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The event that caused this run, if any.
    pub fn trigger(&self) -> Option<&FsEvent> {
        self.trigger.as_ref()
    }

    pub fn sink(&self) -> &dyn ResultSink {
        self.sink.as_ref()
    }

    pub fn sink_arc(&self) -> Arc<dyn ResultSink> {
        Arc::clone(&self.sink)
    }

    /// Start `command` without waiting for it.
    ///
    /// This is the only sanctioned way for an action to leave work running
    /// after it returns: the process is reported to the session's observer,
    /// which keeps watches paused until it exits. `on_exit` runs first, then
    /// the session is notified.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_background(
        &self,
        mut command: Command,
        on_exit: Option<ExitHook>,
    ) -> io::Result<Option<u32>> {
        let child = command.spawn()?;
        let pid = child.id();
        let notifier = self
            .observer
            .as_ref()
            .and_then(|observer| observer.process_spawned(pid));

        debug!(?pid, tracked = notifier.is_some(), "spawned background process");

        tokio::spawn(async move {
            let output = child.wait_with_output().await;
            if let Some(hook) = on_exit {
                hook(output);
            }
            if let Some(notifier) = notifier {
                notifier.notify();
            }
        });

        Ok(pid)
    }
}
