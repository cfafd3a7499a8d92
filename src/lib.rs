//! Service-health monitor
//!
//! Probes a fixed roster of HTTP endpoints on an interval, classifies each
//! into a [`HealthTier`], keeps a bounded latency history per target and
//! maintains an incident ledger that opens on outage and resolves on
//! recovery. Everything is persisted as one JSON [`Snapshot`] that the
//! read API serves to the dashboard.

pub mod actors;
pub mod api;
pub mod classify;
pub mod config;
pub mod history;
pub mod incidents;
pub mod probe;
pub mod reconciler;
pub mod snapshot;
pub mod util;

pub use classify::{HealthTier, classify};
pub use config::{Config, MonitorConfig, TargetConfig, read_config_file};
pub use incidents::{Incident, IncidentLedger, IncidentStatus, Transition};
pub use probe::{HttpProber, Probe, ProbeError, ProbeOutcome, ProbeResult};
pub use reconciler::{CycleReport, IncidentChange, Reconciler, reconcile};
pub use snapshot::{ServiceSnapshot, Snapshot, SnapshotError, SnapshotStore};
