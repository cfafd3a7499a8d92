//! Concurrency tests
//!
//! These tests verify that:
//! - Probes within a cycle run concurrently
//! - Outcomes are applied in roster order, not completion order

use std::time::{Duration, Instant};

use statuswatch::{
    config::{Config, MonitorConfig, SnapshotConfig},
    reconciler::Reconciler,
};
use tempfile::tempdir;
use wiremock::MockServer;

use crate::helpers::*;

#[tokio::test]
async fn test_cycle_cost_bounded_by_slowest_probe() {
    let mock_server = MockServer::start().await;
    for i in 0..4 {
        mount_endpoint(
            &mock_server,
            &format!("/svc{i}"),
            200,
            Duration::from_millis(800),
        )
        .await;
    }

    let dir = tempdir().unwrap();
    let config = Config {
        targets: (0..4)
            .map(|i| create_test_target(&format!("svc{i}"), &format!("{}/svc{i}", mock_server.uri())))
            .collect(),
        monitor: MonitorConfig::default(),
        snapshot: SnapshotConfig {
            path: dir.path().join("status.json"),
        },
    };

    let reconciler = Reconciler::from_config(&config).unwrap();

    let started = Instant::now();
    let report = reconciler.run_cycle().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.snapshot.services.len(), 4);
    assert!(
        elapsed < Duration::from_millis(2400),
        "probes ran sequentially: {elapsed:?}"
    );
}

#[tokio::test]
async fn test_outcomes_applied_in_roster_order() {
    let mock_server = MockServer::start().await;
    // first target answers last
    mount_endpoint(&mock_server, "/first", 200, Duration::from_millis(400)).await;
    mount_endpoint(&mock_server, "/second", 200, Duration::from_millis(100)).await;
    mount_endpoint(&mock_server, "/third", 500, Duration::ZERO).await;

    let dir = tempdir().unwrap();
    let config = Config {
        targets: vec![
            create_test_target("first", &format!("{}/first", mock_server.uri())),
            create_test_target("second", &format!("{}/second", mock_server.uri())),
            create_test_target("third", &format!("{}/third", mock_server.uri())),
        ],
        monitor: MonitorConfig::default(),
        snapshot: SnapshotConfig {
            path: dir.path().join("status.json"),
        },
    };

    let reconciler = Reconciler::from_config(&config).unwrap();
    let outcomes = reconciler.probe_all().await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].latency_ms().unwrap() >= 400);
    assert!(outcomes[1].latency_ms().unwrap() < 400);
    assert!(!outcomes[2].result.is_reachable());

    let report = reconciler.run_cycle().await.unwrap();
    let ids: Vec<_> = report
        .snapshot
        .services
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}
