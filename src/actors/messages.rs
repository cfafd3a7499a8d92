//! Message types for actor communication

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::classify::HealthTier;
use crate::reconciler::{CycleReport, IncidentChange};
use crate::snapshot::Snapshot;

/// Event published after every persisted cycle
#[derive(Debug, Clone)]
pub struct CycleEvent {
    /// Cycle start, same as the snapshot's `updated_at`
    pub updated_at: DateTime<Utc>,

    /// Tier per target, in roster order
    pub tiers: Vec<(String, HealthTier)>,

    /// Incidents opened or resolved during the cycle
    pub changes: Vec<IncidentChange>,

    /// Open incidents after the cycle
    pub open_incidents: usize,
}

impl From<&CycleReport> for CycleEvent {
    fn from(report: &CycleReport) -> Self {
        let snapshot = &report.snapshot;
        Self {
            updated_at: snapshot.updated_at,
            tiers: snapshot
                .services
                .iter()
                .map(|service| (service.id.clone(), service.status))
                .collect(),
            changes: report.changes.clone(),
            open_incidents: snapshot
                .incidents
                .iter()
                .filter(|incident| incident.is_open())
                .count(),
        }
    }
}

/// Commands that can be sent to the MonitorActor
#[derive(Debug)]
pub enum MonitorCommand {
    /// Run a cycle right away (bypassing the interval timer)
    CycleNow {
        /// Channel to send the persisted snapshot back
        respond_to: oneshot::Sender<anyhow::Result<Snapshot>>,
    },

    /// Update the cycle interval
    ///
    /// The timer restarts, so the next cycle runs one full interval later.
    UpdateInterval {
        /// New interval in seconds
        interval_secs: u64,
    },

    /// Gracefully shut down the monitor
    ///
    /// Commands are only handled between cycles, so a running cycle always
    /// completes first.
    Shutdown,
}
