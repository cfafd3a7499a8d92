//! Health tier classification

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::probe::ProbeResult;

/// Successful probes at or above this latency are classified as degraded
pub const DEFAULT_DEGRADED_THRESHOLD_MS: u64 = 300;

/// Derived health classification of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Operational,
    Degraded,
    Outage,
}

impl HealthTier {
    /// Classify a probe result against an explicit degraded threshold.
    ///
    /// Non-success responses fold into the failure path and are outages
    /// regardless of how fast they were answered.
    pub fn classify(result: &ProbeResult, degraded_after: Duration) -> HealthTier {
        match result {
            ProbeResult::Reachable { latency } if *latency >= degraded_after => {
                HealthTier::Degraded
            }
            ProbeResult::Reachable { .. } => HealthTier::Operational,
            ProbeResult::Unhealthy { .. } | ProbeResult::Unreachable { .. } => HealthTier::Outage,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthTier::Operational => "operational",
            HealthTier::Degraded => "degraded",
            HealthTier::Outage => "outage",
        }
    }

    pub fn is_outage(&self) -> bool {
        matches!(self, HealthTier::Outage)
    }
}

impl std::fmt::Display for HealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify with the default 300 ms threshold
pub fn classify(result: &ProbeResult) -> HealthTier {
    HealthTier::classify(result, Duration::from_millis(DEFAULT_DEGRADED_THRESHOLD_MS))
}
