//! One monitoring cycle
//!
//! ```text
//! load prior snapshot → probe all targets concurrently → (roster order)
//!   classify → update history → drive incident ledger → save snapshot
//! ```
//!
//! Probes run concurrently, but their outcomes are applied strictly in
//! roster order once every probe has settled, so ledger results never
//! depend on network timing.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::classify::HealthTier;
use crate::config::{Config, MonitorConfig, TargetConfig};
use crate::history::LatencyHistory;
use crate::incidents::{IncidentLedger, Transition, incident_id};
use crate::probe::{HttpProber, Probe, ProbeError, ProbeOutcome, ProbeResult};
use crate::snapshot::{
    ServiceSnapshot, Snapshot, SnapshotResult, SnapshotStore, file::FileSnapshotStore,
};

/// A ledger transition caused by one target during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentChange {
    pub target_id: String,
    pub incident_id: String,
    pub transition: Transition,
}

/// Everything one cycle produced
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub snapshot: Snapshot,

    /// Only targets whose incident actually opened or resolved
    pub changes: Vec<IncidentChange>,
}

/// Merge one cycle's probe outcomes into the prior snapshot.
///
/// `outcomes` must be in roster order. A target without an outcome counts
/// as unreachable. Prior state of targets that left the
/// roster is dropped, but their incidents stay in the ledger.
pub fn reconcile(
    roster: &[TargetConfig],
    settings: &MonitorConfig,
    prior: Option<Snapshot>,
    outcomes: Vec<ProbeOutcome>,
    started_at: DateTime<Utc>,
) -> CycleReport {
    let (prior_services, prior_incidents) = prior
        .map(|snapshot| (snapshot.services, snapshot.incidents))
        .unwrap_or_default();

    let mut ledger = IncidentLedger::from_entries(prior_incidents);
    let mut services = Vec::with_capacity(roster.len());
    let mut changes = Vec::new();

    let mut outcomes = outcomes.into_iter();
    for target in roster {
        let outcome = outcomes.next().unwrap_or_else(|| {
            warn!("no probe outcome for {}, counting it as unreachable", target.id);
            ProbeOutcome::new(ProbeResult::Unreachable {
                error: ProbeError::NetworkFailure("not probed".to_string()),
            })
        });
        let tier = HealthTier::classify(&outcome.result, settings.degraded_threshold());

        let prior_history = prior_services
            .iter()
            .find(|service| service.id == target.id)
            .map(|service| service.history_ms.clone())
            .unwrap_or_default();
        let mut history =
            LatencyHistory::from_samples(prior_history, settings.history_capacity);
        history.record(outcome.history_sample());

        let transition = ledger.observe(target, tier, outcome.checked_at);
        if transition != Transition::Unchanged {
            changes.push(IncidentChange {
                target_id: target.id.clone(),
                incident_id: incident_id(&target.id),
                transition,
            });
        }

        debug!(
            "{}: {tier} (latency {:?}ms, {} samples)",
            target.id,
            outcome.latency_ms(),
            history.len()
        );

        services.push(ServiceSnapshot {
            id: target.id.clone(),
            name: target.name.clone(),
            url: target.url.clone(),
            status: tier,
            latency_ms: outcome.latency_ms(),
            checked_at: outcome.checked_at,
            history_ms: history.to_vec(),
        });
    }

    CycleReport {
        snapshot: Snapshot {
            updated_at: started_at,
            services,
            incidents: ledger.into_entries(),
        },
        changes,
    }
}

/// Runs cycles over a fixed roster against a snapshot store
pub struct Reconciler {
    roster: Vec<TargetConfig>,
    settings: MonitorConfig,
    prober: Arc<dyn Probe>,
    store: Arc<dyn SnapshotStore>,
}

impl Reconciler {
    pub fn new(
        roster: Vec<TargetConfig>,
        settings: MonitorConfig,
        prober: Arc<dyn Probe>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            roster,
            settings,
            prober,
            store,
        }
    }

    /// HTTP prober and file store as described by the config
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let prober = HttpProber::new(config.monitor.timeout())
            .context("failed to build HTTP client")?;
        let store = FileSnapshotStore::new(&config.snapshot.path);

        Ok(Self::new(
            config.targets.clone(),
            config.monitor.clone(),
            Arc::new(prober),
            Arc::new(store),
        ))
    }

    pub fn roster(&self) -> &[TargetConfig] {
        &self.roster
    }

    pub fn settings(&self) -> &MonitorConfig {
        &self.settings
    }

    pub fn store(&self) -> Arc<dyn SnapshotStore> {
        self.store.clone()
    }

    /// Previous snapshot, or nothing if it is missing or unreadable
    async fn load_prior(&self) -> Option<Snapshot> {
        match self.store.load().await {
            Ok(prior) => prior,
            Err(e) => {
                warn!(
                    "ignoring unreadable snapshot at {}: {e}",
                    self.store.location()
                );
                None
            }
        }
    }

    /// Probe every target concurrently, outcomes in roster order
    pub async fn probe_all(&self) -> Vec<ProbeOutcome> {
        join_all(
            self.roster
                .iter()
                .map(|target| self.prober.probe(target)),
        )
        .await
    }

    /// Run one full cycle and persist its snapshot.
    ///
    /// Only a failed save is an error; probe failures and an unreadable
    /// prior snapshot are handled inside the cycle.
    #[instrument(skip(self), fields(targets = self.roster.len()))]
    pub async fn run_cycle(&self) -> SnapshotResult<CycleReport> {
        let started_at = Utc::now();

        let prior = self.load_prior().await;
        let outcomes = self.probe_all().await;
        let report = reconcile(&self.roster, &self.settings, prior, outcomes, started_at);

        self.store.save(&report.snapshot).await?;

        debug!(
            "cycle finished: {} services, {} incident changes",
            report.snapshot.services.len(),
            report.changes.len()
        );
        Ok(report)
    }
}
