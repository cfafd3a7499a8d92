//! MonitorActor - Drives monitoring cycles
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Reconciler::run_cycle → Publish CycleEvent → [subscribers]
//!     ↑
//!     └─── Commands (CycleNow, UpdateInterval, Shutdown)
//! ```
//!
//! Cycles run inline in the actor loop, so a cycle always finishes before
//! the next tick or command is looked at. Ticks missed during a slow cycle
//! are delayed, never bunched up.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, error, instrument, trace, warn};

use crate::reconciler::Reconciler;
use crate::snapshot::Snapshot;

use super::messages::{CycleEvent, MonitorCommand};

/// Actor that owns the reconciler and runs one cycle per interval
pub struct MonitorActor {
    reconciler: Reconciler,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<MonitorCommand>,

    /// Broadcast sender for publishing completed cycles
    event_tx: broadcast::Sender<CycleEvent>,

    /// Current cycle interval
    interval_duration: Duration,
}

/// Ticker whose first tick fires at `start`
fn cycle_timer(start: Instant, period: Duration) -> Interval {
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

impl MonitorActor {
    pub fn new(
        reconciler: Reconciler,
        interval_duration: Duration,
        command_rx: mpsc::Receiver<MonitorCommand>,
        event_tx: broadcast::Sender<CycleEvent>,
    ) -> Self {
        Self {
            reconciler,
            command_rx,
            event_tx,
            interval_duration,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received or the command channel is
    /// closed. The first cycle starts immediately.
    #[instrument(skip(self), fields(targets = self.reconciler.roster().len()))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        let mut ticker = cycle_timer(Instant::now(), self.interval_duration);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.perform_cycle().await {
                        error!("cycle failed: {:#}", e);
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        MonitorCommand::CycleNow { respond_to } => {
                            debug!("received CycleNow command");
                            let result = self.perform_cycle().await;
                            let _ = respond_to.send(result);
                        }

                        MonitorCommand::UpdateInterval { interval_secs } => {
                            debug!("updating interval to {interval_secs}s");
                            self.interval_duration = Duration::from_secs(interval_secs.max(1));
                            ticker = cycle_timer(
                                Instant::now() + self.interval_duration,
                                self.interval_duration,
                            );
                        }

                        MonitorCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("monitor actor stopped");
    }

    /// Run and persist one cycle, then publish its event
    async fn perform_cycle(&self) -> Result<Snapshot> {
        let report = self.reconciler.run_cycle().await.map_err(|e| {
            anyhow::anyhow!(
                "failed to write snapshot to {}: {e}",
                self.reconciler.store().location()
            )
        })?;

        if let Err(e) = self.event_tx.send(CycleEvent::from(&report)) {
            trace!("no subscribers for cycle event: {}", e);
        }

        Ok(report.snapshot)
    }
}

/// Handle for controlling a MonitorActor
#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    /// Spawn a new monitor actor
    pub fn spawn(
        reconciler: Reconciler,
        interval_duration: Duration,
        event_tx: broadcast::Sender<CycleEvent>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = MonitorActor::new(reconciler, interval_duration, cmd_rx, event_tx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Run a cycle now and return the snapshot it persisted
    pub async fn cycle_now(&self) -> Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::CycleNow { respond_to: tx })
            .await?;

        rx.await?
    }

    /// Update the cycle interval. The next cycle runs one full new
    /// interval after the change.
    pub async fn update_interval(&self, interval_secs: u64) -> Result<()> {
        self.sender
            .send(MonitorCommand::UpdateInterval { interval_secs })
            .await?;
        Ok(())
    }

    /// Shut down the monitor
    pub async fn shutdown(self) {
        let _ = self.sender.send(MonitorCommand::Shutdown).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
