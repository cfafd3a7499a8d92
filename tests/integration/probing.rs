//! Integration tests for HTTP probing
//!
//! These tests verify that:
//! - 2xx responses are reachable and classified by latency
//! - Non-success responses are told apart from network failures
//! - Timeouts are reported as such
//! - Probes ask intermediaries not to serve cached answers

use std::time::Duration;

use assert_matches::assert_matches;
use statuswatch::{
    classify::{HealthTier, classify},
    probe::{HttpProber, Probe, ProbeError, ProbeResult},
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_probe_success() {
    let mock_server = MockServer::start().await;
    mount_endpoint(&mock_server, "/health", 200, Duration::ZERO).await;

    let prober = HttpProber::new(Duration::from_secs(5)).unwrap();
    let target = create_test_target("ok", &format!("{}/health", mock_server.uri()));

    let outcome = prober.probe(&target).await;

    assert_matches!(outcome.result, ProbeResult::Reachable { .. });
    assert!(outcome.latency_ms().is_some());
    assert_eq!(outcome.history_sample(), outcome.latency_ms());
    assert_eq!(classify(&outcome.result), HealthTier::Operational);
}

#[tokio::test]
async fn test_probe_slow_success_is_degraded() {
    let mock_server = MockServer::start().await;
    mount_endpoint(&mock_server, "/slow", 204, Duration::from_millis(350)).await;

    let prober = HttpProber::new(Duration::from_secs(5)).unwrap();
    let target = create_test_target("slow", &format!("{}/slow", mock_server.uri()));

    let outcome = prober.probe(&target).await;

    assert_matches!(outcome.result, ProbeResult::Reachable { .. });
    assert!(outcome.latency_ms().unwrap() >= 350);
    assert_eq!(classify(&outcome.result), HealthTier::Degraded);
}

#[tokio::test]
async fn test_probe_server_error_is_unhealthy() {
    let mock_server = MockServer::start().await;
    mount_endpoint(&mock_server, "/health", 500, Duration::ZERO).await;

    let prober = HttpProber::new(Duration::from_secs(5)).unwrap();
    let target = create_test_target("failing", &format!("{}/health", mock_server.uri()));

    let outcome = prober.probe(&target).await;

    assert_matches!(
        outcome.result,
        ProbeResult::Unhealthy {
            status_code: 500,
            ..
        }
    );
    assert_matches!(
        outcome.result.error(),
        Some(ProbeError::NonSuccessResponse(500))
    );
    assert!(outcome.latency_ms().is_some());
    assert_eq!(outcome.history_sample(), None);
    assert_eq!(classify(&outcome.result), HealthTier::Outage);
}

#[tokio::test]
async fn test_probe_not_found_is_unhealthy() {
    // nothing mounted: wiremock answers 404
    let mock_server = MockServer::start().await;

    let prober = HttpProber::new(Duration::from_secs(5)).unwrap();
    let target = create_test_target("missing", &format!("{}/gone", mock_server.uri()));

    let outcome = prober.probe(&target).await;

    assert_matches!(
        outcome.result,
        ProbeResult::Unhealthy {
            status_code: 404,
            ..
        }
    );
}

#[tokio::test]
async fn test_probe_timeout() {
    let mock_server = MockServer::start().await;
    mount_endpoint(&mock_server, "/hang", 200, Duration::from_secs(3)).await;

    let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
    let target = create_test_target("hang", &format!("{}/hang", mock_server.uri()));

    let started = std::time::Instant::now();
    let outcome = prober.probe(&target).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_matches!(
        outcome.result,
        ProbeResult::Unreachable {
            error: ProbeError::Timeout(_)
        }
    );
    assert_eq!(outcome.latency_ms(), None);
    assert_eq!(classify(&outcome.result), HealthTier::Outage);
}

#[tokio::test]
async fn test_probe_connection_refused() {
    let prober = HttpProber::new(Duration::from_secs(2)).unwrap();
    let target = create_test_target("refused", &unused_local_url());

    let outcome = prober.probe(&target).await;

    assert_matches!(
        outcome.result,
        ProbeResult::Unreachable {
            error: ProbeError::NetworkFailure(_)
        }
    );
}

#[tokio::test]
async fn test_probe_sends_no_cache_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let prober = HttpProber::new(Duration::from_secs(5)).unwrap();
    let target = create_test_target("cached", &format!("{}/health", mock_server.uri()));

    let outcome = prober.probe(&target).await;
    assert_matches!(outcome.result, ProbeResult::Reachable { .. });

    mock_server.verify().await;
}
