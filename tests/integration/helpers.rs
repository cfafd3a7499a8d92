//! Helper functions for integration tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use statuswatch::{
    config::{MonitorConfig, TargetConfig},
    probe::{Probe, ProbeError, ProbeOutcome, ProbeResult},
    reconciler::Reconciler,
    snapshot::SnapshotStore,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn create_test_target(id: &str, url: &str) -> TargetConfig {
    TargetConfig::new(id, format!("Test {id}"), url)
}

pub fn create_test_settings(history_capacity: usize) -> MonitorConfig {
    MonitorConfig {
        timeout: 1,
        history_capacity,
        ..MonitorConfig::default()
    }
}

pub fn reachable(ms: u64) -> ProbeResult {
    ProbeResult::Reachable {
        latency: Duration::from_millis(ms),
    }
}

pub fn unreachable() -> ProbeResult {
    ProbeResult::Unreachable {
        error: ProbeError::NetworkFailure("connection refused".to_string()),
    }
}

/// Probe that replays a fixed script of results per target id.
///
/// Targets without a script left are reported unreachable.
#[derive(Default)]
pub struct ScriptedProber {
    scripts: Mutex<HashMap<String, VecDeque<ProbeResult>>>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, target_id: &str, results: Vec<ProbeResult>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(target_id.to_string(), results.into());
        self
    }
}

#[async_trait]
impl Probe for ScriptedProber {
    async fn probe(&self, target: &TargetConfig) -> ProbeOutcome {
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&target.id)
            .and_then(|script| script.pop_front());

        ProbeOutcome::new(next.unwrap_or_else(unreachable))
    }
}

pub fn create_scripted_reconciler(
    roster: Vec<TargetConfig>,
    history_capacity: usize,
    prober: ScriptedProber,
    store: Arc<dyn SnapshotStore>,
) -> Reconciler {
    Reconciler::new(
        roster,
        create_test_settings(history_capacity),
        Arc::new(prober),
        store,
    )
}

/// Mount a GET handler answering `status` after `delay`
pub async fn mount_endpoint(server: &MockServer, route: &str, status: u16, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_delay(delay))
        .mount(server)
        .await;
}

/// URL of a local port nobody listens on
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
