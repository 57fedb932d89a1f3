// src/engine/session.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::guard::{CycleOutcome, PauseGuard};
use crate::engine::{PauseState, SessionEvent, SessionId};
use crate::errors::{PausewatchError, Result, WatchRegistrationError};
use crate::exec::{ActionContext, ActionRunner, ActionSpec, ResultSink};
use crate::types::FsEvent;
use crate::watch::{should_trigger, WatchDescriptor, WatchSet};

/// Per-session behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Act on `Created` / `Renamed` events.
    pub watch_for_creations: bool,
    /// Expand directories into per-file watches.
    pub recursive: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            watch_for_creations: true,
            recursive: true,
        }
    }
}

/// One running watch: its watches, its action and its pause state.
///
/// Created by [`crate::engine::Initiator::start`]. Drive it with
/// [`WatchSession::run`], or step it with [`WatchSession::next_event`] and
/// [`WatchSession::handle_event`].
pub struct WatchSession {
    id: SessionId,
    set: WatchSet,
    action: ActionSpec,
    runner: ActionRunner,
    sink: Arc<dyn ResultSink>,
    options: SessionOptions,
    state: PauseState,
    cycle: u64,
    // Descriptors waiting for background processes while `Draining`.
    pending: Vec<WatchDescriptor>,
    live: Arc<AtomicBool>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSession")
            .field("id", &self.id)
            .field("set", &self.set)
            .field("action", &self.action)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl WatchSession {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: SessionId,
        set: WatchSet,
        action: ActionSpec,
        runner: ActionRunner,
        sink: Arc<dyn ResultSink>,
        options: SessionOptions,
        events_tx: mpsc::UnboundedSender<SessionEvent>,
        events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> Self {
        Self {
            id,
            set,
            action,
            runner,
            sink,
            options,
            state: PauseState::Armed,
            cycle: 0,
            pending: Vec::new(),
            live: Arc::new(AtomicBool::new(true)),
            events_tx,
            events_rx,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> PauseState {
        self.state
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Number of pause cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Paths with a live watch right now.
    pub fn watched_paths(&self) -> BTreeSet<PathBuf> {
        self.set.paths()
    }

    pub fn active_watch_count(&self) -> usize {
        self.set.len()
    }

    /// A cloneable handle for cancelling the session from elsewhere.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            id: self.id,
            live: Arc::clone(&self.live),
            tx: self.events_tx.clone(),
        }
    }

    /// Wait for the next queued event.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Take the next queued event without waiting.
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Main event loop. Returns once the session is cancelled.
    ///
    /// Action failures are reported here and do not end the session.
    pub async fn run(mut self) -> Result<()> {
        info!(session = self.id, watches = self.set.len(), "watch session running");

        while let Some(event) = self.events_rx.recv().await {
            match self.handle_event(event).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) if !self.is_live() => {
                    error!(session = self.id, error = %err, "watch session stopped");
                    self.cancel();
                    break;
                }
                Err(err) => {
                    error!(
                        session = self.id,
                        action = %self.action.describe(),
                        error = %err,
                        "action failed"
                    );
                }
            }
        }

        info!(session = self.id, "watch session finished");
        Ok(())
    }

    /// Handle a single event. Returns whether the session keeps running.
    ///
    /// An error means the triggered action failed; the watches have already
    /// been restored (or handed to background processes) by then. If instead
    /// no watch at all could be restored, the session is cancelled and the
    /// registration error is returned.
    pub async fn handle_event(&mut self, event: SessionEvent) -> Result<bool> {
        match event {
            SessionEvent::Fs(event) => {
                if !self.is_live() {
                    self.cancel();
                    return Ok(false);
                }
                self.on_fs_event(event).await?;
                Ok(true)
            }
            SessionEvent::ProcessExited { cycle, pid } => {
                self.on_process_exit(cycle, pid)?;
                if !self.is_live() {
                    self.cancel();
                    return Ok(false);
                }
                Ok(true)
            }
            SessionEvent::CancelRequested => {
                self.cancel();
                Ok(false)
            }
        }
    }

    /// Remove every watch and drop any pending restoration.
    pub fn cancel(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        if self.state == PauseState::Cancelled {
            return;
        }

        self.set.remove_all();
        self.pending.clear();
        self.state = PauseState::Cancelled;
        info!(session = self.id, "watch session cancelled");
    }

    async fn on_fs_event(&mut self, event: FsEvent) -> Result<()> {
        // Events queued before their handle was removed are stale.
        if !self.set.contains(event.handle) {
            debug!(session = self.id, handle = %event.handle, path = ?event.path, "dropping event from inactive handle");
            return Ok(());
        }

        if !should_trigger(&event, self.options.watch_for_creations) {
            debug!(session = self.id, kind = ?event.kind, path = ?event.path, "event filtered");
            return Ok(());
        }

        self.trigger(event).await
    }

    async fn trigger(&mut self, event: FsEvent) -> Result<()> {
        self.cycle += 1;
        let cycle = self.cycle;
        info!(
            session = self.id,
            cycle,
            kind = ?event.kind,
            path = ?event.path,
            action = %self.action.describe(),
            "change detected; running action"
        );

        self.state = PauseState::Paused;
        let ctx = ActionContext::new(Some(event), Arc::clone(&self.sink));
        let report = PauseGuard::run(
            &mut self.set,
            &self.runner,
            &self.action,
            ctx,
            cycle,
            self.events_tx.clone(),
        )
        .await;

        match report.outcome {
            CycleOutcome::Restored { restored } => {
                self.state = PauseState::Armed;
                debug!(session = self.id, cycle, restored, "session re-armed");
            }
            CycleOutcome::Lost { error } => {
                if let Err(action_err) = report.result {
                    error!(session = self.id, cycle, error = %action_err, "action failed");
                }
                return Err(self.watches_lost(cycle, error));
            }
            CycleOutcome::Draining {
                outstanding,
                descriptors,
            } => {
                self.pending = descriptors;
                self.state = PauseState::Draining { cycle, outstanding };
            }
        }

        report.result
    }

    fn on_process_exit(&mut self, cycle: u64, pid: Option<u32>) -> Result<()> {
        if !self.is_live() {
            debug!(session = self.id, cycle, ?pid, "session cancelled; not restoring watches");
            return Ok(());
        }

        match self.state {
            PauseState::Draining {
                cycle: draining,
                outstanding,
            } if draining == cycle => {
                if outstanding > 1 {
                    self.state = PauseState::Draining {
                        cycle,
                        outstanding: outstanding - 1,
                    };
                    debug!(session = self.id, cycle, ?pid, remaining = outstanding - 1, "background process done");
                    return Ok(());
                }

                match self.set.restore(std::mem::take(&mut self.pending)) {
                    Ok(restored) => {
                        self.state = PauseState::Armed;
                        info!(session = self.id, cycle, ?pid, restored, "background work finished; watches restored");
                    }
                    Err(error) => return Err(self.watches_lost(cycle, error)),
                }
            }
            _ => {
                debug!(session = self.id, cycle, ?pid, state = ?self.state, "ignoring exit of untracked process");
            }
        }
        Ok(())
    }

    /// Nothing is watched any more, so no event can ever re-arm the session.
    fn watches_lost(&mut self, cycle: u64, error: WatchRegistrationError) -> PausewatchError {
        error!(session = self.id, cycle, error = %error, "no watch could be restored; stopping session");
        self.cancel();
        PausewatchError::WatchRegistration(error)
    }
}

/// Cancels a [`WatchSession`] from outside its event loop.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    live: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Mark the session dead and ask its loop to tear down the watches.
    ///
    /// Pending restorations observe the flag and do nothing.
    pub fn cancel(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            let _ = self.tx.send(SessionEvent::CancelRequested);
        }
    }
}
