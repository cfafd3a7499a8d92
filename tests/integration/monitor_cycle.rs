//! Integration tests for the monitor actor against live endpoints

use std::time::Duration;

use statuswatch::{
    actors::monitor::MonitorHandle,
    classify::HealthTier,
    config::{Config, MonitorConfig, SnapshotConfig},
    incidents::{IncidentStatus, Transition},
    reconciler::Reconciler,
};
use tempfile::tempdir;
use tokio::sync::broadcast;
use wiremock::MockServer;

use crate::helpers::*;

#[tokio::test]
async fn test_monitor_opens_and_resolves_incident() {
    let mock_server = MockServer::start().await;
    mount_endpoint(&mock_server, "/health", 503, Duration::ZERO).await;

    let dir = tempdir().unwrap();
    let config = Config {
        targets: vec![create_test_target(
            "api",
            &format!("{}/health", mock_server.uri()),
        )],
        monitor: MonitorConfig {
            timeout: 2,
            interval: 3600,
            ..MonitorConfig::default()
        },
        snapshot: SnapshotConfig {
            path: dir.path().join("status.json"),
        },
    };

    let (event_tx, mut event_rx) = broadcast::channel(16);
    let handle = MonitorHandle::spawn(
        Reconciler::from_config(&config).unwrap(),
        config.monitor.interval(),
        event_tx,
    );

    // startup cycle
    let event = tokio::time::timeout(Duration::from_secs(5), event_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.tiers, vec![("api".to_string(), HealthTier::Outage)]);
    assert_eq!(event.changes[0].transition, Transition::Opened);

    // still failing: no duplicate
    let snapshot = handle.cycle_now().await.unwrap();
    assert_eq!(snapshot.incidents.len(), 1);
    let _ = event_rx.recv().await.unwrap();

    // endpoint recovers
    mock_server.reset().await;
    mount_endpoint(&mock_server, "/health", 200, Duration::ZERO).await;

    let snapshot = handle.cycle_now().await.unwrap();
    assert_eq!(snapshot.services[0].status, HealthTier::Operational);
    assert_eq!(snapshot.services[0].history_ms.len(), 1);
    assert_eq!(snapshot.incidents[0].status, IncidentStatus::Resolved);

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event.changes[0].transition, Transition::Resolved);
    assert_eq!(event.open_incidents, 0);

    handle.shutdown().await;
}
