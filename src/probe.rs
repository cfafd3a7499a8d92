//! HTTP health probes
//!
//! A probe issues exactly one GET request against a target's URL with a
//! bounded timeout and reports a typed result. Probes never fail as a
//! whole: timeouts, connection errors and non-success responses are all
//! part of the returned [`ProbeResult`].

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use tracing::{instrument, trace, warn};

use crate::config::TargetConfig;

/// Why a probe did not produce a healthy response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No response within the configured timeout
    Timeout(Duration),

    /// DNS, connect, TLS or transport failure
    NetworkFailure(String),

    /// A response arrived, but with a non-2xx status
    NonSuccessResponse(u16),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Timeout(timeout) => {
                write!(f, "no response within {}ms", timeout.as_millis())
            }
            ProbeError::NetworkFailure(msg) => write!(f, "request failed: {}", msg),
            ProbeError::NonSuccessResponse(code) => {
                write!(f, "unexpected status code: {}", code)
            }
        }
    }
}

impl std::error::Error for ProbeError {}

/// Result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// 2xx response
    Reachable { latency: Duration },

    /// Response with a non-success status
    Unhealthy { latency: Duration, status_code: u16 },

    /// Timeout or network failure, no response at all
    Unreachable { error: ProbeError },
}

impl ProbeResult {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeResult::Reachable { .. })
    }

    /// Measured latency, absent when no response arrived
    pub fn latency(&self) -> Option<Duration> {
        match self {
            ProbeResult::Reachable { latency } | ProbeResult::Unhealthy { latency, .. } => {
                Some(*latency)
            }
            ProbeResult::Unreachable { .. } => None,
        }
    }

    pub fn error(&self) -> Option<ProbeError> {
        match self {
            ProbeResult::Reachable { .. } => None,
            ProbeResult::Unhealthy { status_code, .. } => {
                Some(ProbeError::NonSuccessResponse(*status_code))
            }
            ProbeResult::Unreachable { error } => Some(error.clone()),
        }
    }
}

/// A probe result stamped with the time the probe settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub result: ProbeResult,
    pub checked_at: DateTime<Utc>,
}

impl ProbeOutcome {
    pub fn new(result: ProbeResult) -> Self {
        Self {
            result,
            checked_at: Utc::now(),
        }
    }

    /// Latency in whole milliseconds, as reported in the snapshot
    pub fn latency_ms(&self) -> Option<u64> {
        self.result.latency().map(|latency| latency.as_millis() as u64)
    }

    /// Latency sample for the history window. Only successful probes
    /// contribute samples.
    pub fn history_sample(&self) -> Option<u64> {
        if self.result.is_reachable() {
            self.latency_ms()
        } else {
            None
        }
    }
}

/// Something that can check a target's health
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, target: &TargetConfig) -> ProbeOutcome;
}

/// Probe implementation backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpProber {
    /// HTTP client (reused across requests for efficiency)
    client: reqwest::Client,

    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout(self.timeout)
        } else {
            ProbeError::NetworkFailure(err.to_string())
        }
    }
}

#[async_trait]
impl Probe for HttpProber {
    #[instrument(skip_all, fields(target_id = %target.id))]
    async fn probe(&self, target: &TargetConfig) -> ProbeOutcome {
        trace!("probing {}", target.url);

        let start = Instant::now();
        let response = self
            .client
            .get(&target.url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .send()
            .await;
        let latency = start.elapsed();

        let result = match response {
            Ok(response) if response.status().is_success() => ProbeResult::Reachable { latency },
            Ok(response) => {
                let status_code = response.status().as_u16();
                warn!("{} answered with status {status_code}", target.url);
                ProbeResult::Unhealthy {
                    latency,
                    status_code,
                }
            }
            Err(e) => {
                let error = self.map_error(e);
                warn!("{} unreachable: {error}", target.url);
                ProbeResult::Unreachable { error }
            }
        };

        trace!("probe finished after {}ms", latency.as_millis());
        ProbeOutcome::new(result)
    }
}
