use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::gate::session::SessionContext;
use crate::gate::state::{GateMachine, Transition};
use crate::gate::window::{AccessWindow, Evaluation};

/// Default polling cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of one poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateEvent {
    /// Normalized instant the evaluation was made at
    pub at: DateTime<FixedOffset>,
    pub evaluation: Evaluation,
    /// Set when this tick changed the gate state
    pub transition: Option<Transition>,
}

/// Repeating gate evaluation task
pub struct GatePoller {
    window: AccessWindow,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl GatePoller {
    pub fn new(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            window: AccessWindow::STANDARD,
            clock,
            interval,
        }
    }

    pub fn with_window(mut self, window: AccessWindow) -> Self {
        self.window = window;
        self
    }

    /// Evaluate once against the current clock
    pub fn poll(&self, machine: &mut GateMachine, session: &SessionContext) -> GateEvent {
        let at = self.clock.now();
        let evaluation = self.window.evaluate(&at, session);
        let transition = machine.observe(&evaluation);
        GateEvent {
            at,
            evaluation,
            transition,
        }
    }

    /// Start polling on the runtime.
    ///
    /// The session context is re-read on every tick. The first tick fires
    /// immediately, so the receiver learns the initial state right away.
    /// The task ends when the handle is stopped or dropped, or when `events`
    /// is closed.
    pub fn spawn(
        self,
        session: watch::Receiver<SessionContext>,
        events: mpsc::Sender<GateEvent>,
    ) -> PollerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut machine = GateMachine::new();

            debug!("Gate poller started ({} ms interval)", self.interval.as_millis());

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => {
                        debug!("Gate poller stop requested");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                let context = *session.borrow();
                let event = self.poll(&mut machine, &context);

                if let Some(transition) = event.transition {
                    match transition.from {
                        Some(from) => info!(
                            "Gate {} -> {} at {}",
                            from,
                            transition.to,
                            event.at.format("%H:%M:%S")
                        ),
                        None => info!("Gate initially {}", transition.to),
                    }
                }

                // A full channel must not keep the poller from seeing a stop
                tokio::select! {
                    _ = stop_rx.changed() => {
                        debug!("Gate poller stop requested");
                        break;
                    }
                    sent = events.send(event) => {
                        if sent.is_err() {
                            debug!("Gate event receiver closed, stopping poller");
                            break;
                        }
                    }
                }
            }
        });

        PollerHandle { stop_tx, task }
    }
}

/// Handle to a running [`GatePoller`]
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the task to finish
    pub async fn stop(self) -> Result<()> {
        // Err only means the task already exited
        let _ = self.stop_tx.send(true);
        self.task.await.context("Gate poller task failed")?;
        Ok(())
    }
}
