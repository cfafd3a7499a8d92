//! Incident ledger
//!
//! Tracks outage incidents per target with the following state machine:
//!
//! ```text
//! no incident --(outage)--> open --(any other tier)--> resolved
//!                            |  ^
//!                            +--+ (outage persists: no-op)
//! ```
//!
//! Resolved incidents are terminal and stay in the log forever. A fresh
//! outage after resolution opens a new entry with the same derived id.
//!
//! The ledger keeps every entry in one ordered log and indexes the single
//! open entry per incident id, so there can never be two open incidents
//! for the same target.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::HealthTier;
use crate::config::TargetConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Open,
    Resolved,
}

/// Severity assigned to every incident opened by the monitor. Persisted
/// entries may carry any other label, which is kept as-is.
pub const OUTAGE_SEVERITY: &str = "major";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub status: IncidentStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub description: String,
}

impl Incident {
    fn open(target: &TargetConfig, now: DateTime<Utc>) -> Self {
        Self {
            id: incident_id(&target.id),
            title: format!("{} outage", target.name),
            severity: OUTAGE_SEVERITY.to_string(),
            status: IncidentStatus::Open,
            started_at: now,
            resolved_at: None,
            description: format!("{} is not responding as expected.", target.name),
        }
    }

    fn resolve(&mut self, target: &TargetConfig, now: DateTime<Utc>) {
        self.status = IncidentStatus::Resolved;
        self.resolved_at = Some(now);
        self.description = format!("{} has recovered and is responding again.", target.name);
    }

    pub fn is_open(&self) -> bool {
        self.status == IncidentStatus::Open
    }
}

/// Deterministic incident identity for a target
pub fn incident_id(target_id: &str) -> String {
    format!("outage-{target_id}")
}

/// What an observation did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Resolved,
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct IncidentLedger {
    /// All entries, oldest first
    log: Vec<Incident>,

    /// Incident id -> position of its open entry in `log`
    open: HashMap<String, usize>,
}

impl IncidentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted entries (newest first).
    ///
    /// Documents edited by hand or written by a second monitor can contain
    /// several open entries for one id. Only the newest of them stays open;
    /// older ones are closed at the moment the newer one started.
    pub fn from_entries(entries: Vec<Incident>) -> Self {
        let mut ledger = Self::new();

        for incident in entries.into_iter().rev() {
            let position = ledger.log.len();

            if incident.is_open() {
                if let Some(previous) = ledger.open.insert(incident.id.clone(), position) {
                    warn!(
                        "closing superseded open incident '{}' from {}",
                        incident.id, ledger.log[previous].started_at
                    );
                    let superseded = &mut ledger.log[previous];
                    superseded.status = IncidentStatus::Resolved;
                    superseded.resolved_at = Some(incident.started_at);
                }
            }

            ledger.log.push(incident);
        }

        ledger
    }

    /// Feed the latest tier of a target into the ledger
    pub fn observe(
        &mut self,
        target: &TargetConfig,
        tier: HealthTier,
        now: DateTime<Utc>,
    ) -> Transition {
        let id = incident_id(&target.id);

        match (tier.is_outage(), self.open.get(&id).copied()) {
            (true, None) => {
                debug!("opening incident '{id}'");
                self.open.insert(id, self.log.len());
                self.log.push(Incident::open(target, now));
                Transition::Opened
            }
            (false, Some(position)) => {
                debug!("resolving incident '{id}'");
                self.open.remove(&id);
                self.log[position].resolve(target, now);
                Transition::Resolved
            }
            _ => Transition::Unchanged,
        }
    }

    /// The open incident of a target, if any
    pub fn open_incident(&self, target_id: &str) -> Option<&Incident> {
        self.open
            .get(&incident_id(target_id))
            .map(|&position| &self.log[position])
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Entries newest first
    pub fn entries(&self) -> impl Iterator<Item = &Incident> {
        self.log.iter().rev()
    }

    /// Entries newest first, as persisted
    pub fn into_entries(self) -> Vec<Incident> {
        let mut log = self.log;
        log.reverse();
        log
    }
}
