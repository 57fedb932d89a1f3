// src/engine/guard.rs

//! One pause cycle: snapshot and clear the watch set, run the action with a
//! process sentinel installed, then restore the watches immediately or leave
//! that to the background processes' exit notifications.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::SessionEvent;
use crate::errors::{Result, WatchRegistrationError};
use crate::exec::{ActionContext, ActionRunner, ActionSpec, ProcessObserver, ProcessSentinel};
use crate::watch::{WatchDescriptor, WatchSet};

/// How a pause cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Watches are back.
    Restored { restored: usize },
    /// Not a single watch could be re-registered.
    Lost { error: WatchRegistrationError },
    /// Background processes are still running; `descriptors` must be
    /// restored once all `outstanding` of them have exited.
    Draining {
        outstanding: usize,
        descriptors: Vec<WatchDescriptor>,
    },
}

/// Result of [`PauseGuard::run`]: the watch outcome plus whatever the action
/// returned. The outcome is settled even when the action failed.
#[derive(Debug)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub result: Result<()>,
}

/// Watches of a session taken down for the duration of one action.
///
/// While the guard exists the watch set is empty, so nothing the action does
/// to the watched files can reach the session.
#[derive(Debug)]
pub struct PauseGuard<'a> {
    set: &'a mut WatchSet,
    descriptors: Vec<WatchDescriptor>,
    sentinel: ProcessSentinel,
    cycle: u64,
}

impl<'a> PauseGuard<'a> {
    /// Remove every watch in `set` and start spotting background processes.
    pub fn engage(
        set: &'a mut WatchSet,
        cycle: u64,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let descriptors = set.snapshot_and_clear();
        let sentinel = ProcessSentinel::install(cycle, events);
        debug!(cycle, paused = descriptors.len(), "watches paused");

        Self {
            set,
            descriptors,
            sentinel,
            cycle,
        }
    }

    pub fn observer(&self) -> ProcessObserver {
        self.sentinel.observer()
    }

    /// Uninstall the sentinel and decide who restores the watches.
    pub fn release(self) -> CycleOutcome {
        let spotted = self.sentinel.uninstall();

        if spotted == 0 {
            match self.set.restore(self.descriptors) {
                Ok(restored) => {
                    debug!(cycle = self.cycle, restored, "watches restored");
                    CycleOutcome::Restored { restored }
                }
                Err(error) => CycleOutcome::Lost { error },
            }
        } else {
            info!(
                cycle = self.cycle,
                outstanding = spotted,
                "action left background processes running; deferring watch restore"
            );
            CycleOutcome::Draining {
                outstanding: spotted,
                descriptors: self.descriptors,
            }
        }
    }

    /// A full pause cycle around `action`.
    pub async fn run(
        set: &'a mut WatchSet,
        runner: &ActionRunner,
        action: &ActionSpec,
        ctx: ActionContext,
        cycle: u64,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> CycleReport {
        let guard = PauseGuard::engage(set, cycle, events);
        let ctx = ctx.with_observer(guard.observer());

        let result = runner.run(action, &ctx).await;

        CycleReport {
            outcome: guard.release(),
            result,
        }
    }
}
