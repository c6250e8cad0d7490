//! Tests for the conditional supergraph fetcher

use std::time::Duration;

use crate::config::RegistryConfig;
use crate::error::{FetchError, TransportError};
use crate::fetcher::{content_id, SupergraphFetcher};
use crate::test_support::{FakeTransport, Step};

const SDL: &str = "type Query { hi: String }";

fn test_config() -> RegistryConfig {
    RegistryConfig::new("https://cdn.example.com/artifacts/v1/abc", "cdn-key")
        .with_request_timeout(Duration::from_secs(1))
}

fn fetcher(transport: FakeTransport) -> SupergraphFetcher<FakeTransport> {
    SupergraphFetcher::from_config(&test_config(), transport)
}

#[test]
fn test_content_id_is_deterministic() {
    let a = content_id(SDL);
    let b = content_id(&SDL.to_string());
    assert_eq!(a, b);

    // base64 of a 32-byte digest, not the document itself
    assert_eq!(a.len(), 44);
    assert_ne!(a, content_id("type Query { bye: String }"));
}

#[test]
fn test_fetcher_polls_the_normalized_supergraph_url() {
    let fetcher = fetcher(FakeTransport::default());
    assert_eq!(
        fetcher.url(),
        "https://cdn.example.com/artifacts/v1/abc/supergraph"
    );
}

#[tokio::test]
async fn test_fresh_fetch_returns_content_addressed_snapshot() {
    let transport = FakeTransport::scripted(vec![Step::ok(SDL, None)]);
    let mut fetcher = fetcher(transport.clone());

    let snapshot = fetcher.fetch().await.expect("fetch");
    assert_eq!(snapshot.supergraph_sdl, SDL);
    assert_eq!(snapshot.id, content_id(SDL));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].key, "cdn-key");
    assert!(requests[0].user_agent.starts_with("hive-registry/"));
    assert!(requests[0].if_none_match.is_none());
}

#[tokio::test]
async fn test_not_modified_returns_cached_snapshot() {
    let transport = FakeTransport::scripted(vec![
        Step::ok(SDL, Some("\"v1\"")),
        Step::status(304),
        Step::status(304),
    ]);
    let mut fetcher = fetcher(transport.clone());

    let first = fetcher.fetch().await.expect("fresh fetch");
    let second = fetcher.fetch().await.expect("cached fetch");
    let third = fetcher.fetch().await.expect("cached fetch");

    assert_eq!(second, first);
    assert_eq!(third, first);

    // The cached etag rides along as a conditional header.
    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].if_none_match.as_deref(), Some("\"v1\""));
    assert_eq!(requests[2].if_none_match.as_deref(), Some("\"v1\""));
}

#[tokio::test]
async fn test_fresh_fetch_without_etag_does_not_populate_cache() {
    let transport = FakeTransport::scripted(vec![Step::ok(SDL, None), Step::status(304)]);
    let mut fetcher = fetcher(transport.clone());

    fetcher.fetch().await.expect("fresh fetch");
    let error = fetcher.fetch().await.expect_err("no cache to serve");

    assert!(matches!(error, FetchError::Status { status: 304 }));
    assert!(transport.requests()[1].if_none_match.is_none());
}

#[tokio::test]
async fn test_not_modified_without_cache_fails_without_retry() {
    let transport = FakeTransport::scripted(vec![Step::status(304)]);
    let mut fetcher = fetcher(transport.clone());

    let error = fetcher.fetch().await.expect_err("304 with empty cache");
    assert!(matches!(error, FetchError::Status { status: 304 }));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_server_errors_retry_up_to_ceiling() {
    // 1 initial attempt + 10 retries, then terminal failure.
    let transport = FakeTransport::repeating_status(500, 12);
    let mut fetcher = fetcher(transport.clone());

    let error = fetcher.fetch().await.expect_err("retries exhausted");
    assert!(matches!(error, FetchError::Status { status: 500 }));
    assert_eq!(error.status(), Some(500));
    assert_eq!(transport.request_count(), 11);
}

#[tokio::test]
async fn test_server_error_then_success_recovers() {
    let transport = FakeTransport::scripted(vec![Step::status(503), Step::ok(SDL, None)]);
    let mut fetcher = fetcher(transport.clone());

    let snapshot = fetcher.fetch().await.expect("second attempt succeeds");
    assert_eq!(snapshot.supergraph_sdl, SDL);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_client_error_fails_immediately() {
    let transport = FakeTransport::scripted(vec![Step::status(403)]);
    let mut fetcher = fetcher(transport.clone());

    let error = fetcher.fetch().await.expect_err("403 is terminal");
    assert!(matches!(error, FetchError::Status { status: 403 }));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_transport_error_propagates_unchanged() {
    let transport = FakeTransport::scripted(vec![Step::Fail(TransportError::Connect(
        "refused".into(),
    ))]);
    let mut fetcher = fetcher(transport.clone());

    let error = fetcher.fetch().await.expect_err("connection failure");
    assert!(matches!(
        error,
        FetchError::Transport(TransportError::Connect(_))
    ));

    // Transport failures carry no HTTP status.
    assert_eq!(error.status(), None);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_fresh_success_replaces_cache_entry() {
    let updated = "type Query { hi: String bye: String }";
    let transport = FakeTransport::scripted(vec![
        Step::ok(SDL, Some("\"v1\"")),
        Step::ok(updated, Some("\"v2\"")),
        Step::status(304),
    ]);
    let mut fetcher = fetcher(transport.clone());

    fetcher.fetch().await.expect("first fetch");
    let second = fetcher.fetch().await.expect("second fetch");
    let cached = fetcher.fetch().await.expect("cached fetch");

    assert_eq!(cached, second);
    assert_eq!(cached.supergraph_sdl, updated);
    assert_eq!(transport.requests()[2].if_none_match.as_deref(), Some("\"v2\""));
}

#[tokio::test]
async fn test_retry_ceiling_is_configurable() {
    let config = test_config().with_max_retries(2);
    let transport = FakeTransport::repeating_status(502, 5);
    let mut fetcher = SupergraphFetcher::from_config(&config, transport.clone());

    let error = fetcher.fetch().await.expect_err("ceiling of 2");
    assert!(matches!(error, FetchError::Status { status: 502 }));
    assert_eq!(transport.request_count(), 3);
}
