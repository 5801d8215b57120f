//! HTTP contract tests against mocked Twitter API and webhook servers.

use std::sync::Arc;

use notify::WebhookChannel;
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tweetcord::{
    AccountId, FeedClient, FeedError, FeedSource, FileStateStore, MonitorConfig, MonitorLoop,
    PostNotifier, RunMode,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> FeedClient {
    FeedClient::with_base_url(server.uri(), "test-token").unwrap()
}

async fn mount_lookup(server: &MockServer, username: &str, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/users/by/username/{username}")))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": id, "name": "Rust", "username": username}
        })))
        .mount(server)
        .await;
}

async fn mount_timeline(server: &MockServer, account: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{account}/tweets")))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("max_results", "5"))
        .and(query_param("exclude", "retweets,replies"))
        .and(query_param("tweet.fields", "created_at"))
        .respond_with(response)
        .mount(server)
        .await;
}

// =============================================================================
// Account resolution
// =============================================================================

#[tokio::test]
async fn test_resolve_account_returns_id() {
    let server = MockServer::start().await;
    mount_lookup(&server, "rustlang", "165262854").await;

    let account = client(&server).resolve_account("rustlang").await.unwrap();
    assert_eq!(account, AccountId("165262854".into()));
}

#[tokio::test]
async fn test_resolve_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/by/username/nobody"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"title": "Not Found Error", "detail": "Could not find user with username: [nobody]."}]
        })))
        .mount(&server)
        .await;

    let err = client(&server).resolve_account("nobody").await.unwrap_err();
    assert!(matches!(err, FeedError::NotFound(name) if name == "nobody"));
}

#[tokio::test]
async fn test_resolve_unauthorized_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client(&server).resolve_account("rustlang").await.unwrap_err();
    assert!(matches!(err, FeedError::Status { status: 401, .. }));
    assert!(!err.is_rate_limited());
}

// =============================================================================
// Timeline fetch
// =============================================================================

#[tokio::test]
async fn test_fetch_recent_keeps_newest_first_order() {
    let server = MockServer::start().await;
    mount_timeline(
        &server,
        "42",
        ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "1003", "created_at": "2024-06-03T00:00:00.000Z", "text": "c"},
                {"id": "1002", "created_at": "2024-06-02T00:00:00.000Z", "text": "b"},
                {"id": "1001", "created_at": "2024-06-01T00:00:00.000Z", "text": "a"}
            ],
            "meta": {"result_count": 3, "newest_id": "1003", "oldest_id": "1001"}
        })),
    )
    .await;

    let posts = client(&server)
        .fetch_recent(&AccountId("42".into()))
        .await
        .unwrap();
    let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1003", "1002", "1001"]);
    assert!(posts.iter().all(|p| p.created_at.is_some()));
}

#[tokio::test]
async fn test_fetch_recent_without_data_is_empty() {
    let server = MockServer::start().await;
    mount_timeline(
        &server,
        "42",
        ResponseTemplate::new(200).set_body_json(json!({"meta": {"result_count": 0}})),
    )
    .await;

    let posts = client(&server)
        .fetch_recent(&AccountId("42".into()))
        .await
        .unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_fetch_recent_429_is_rate_limited() {
    let server = MockServer::start().await;
    mount_timeline(
        &server,
        "42",
        ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1717200000"),
    )
    .await;

    let err = client(&server)
        .fetch_recent(&AccountId("42".into()))
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert!(matches!(
        err,
        FeedError::RateLimited {
            reset_at: Some(1_717_200_000)
        }
    ));
}

#[tokio::test]
async fn test_fetch_recent_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    mount_timeline(&server, "42", ResponseTemplate::new(503)).await;

    let err = client(&server)
        .fetch_recent(&AccountId("42".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_fetch_recent_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    mount_timeline(
        &server,
        "42",
        ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
    )
    .await;

    let err = client(&server)
        .fetch_recent(&AccountId("42".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Decode(_)));
}

// =============================================================================
// End to end
// =============================================================================

#[tokio::test]
async fn test_single_run_posts_to_webhook_and_persists() {
    let api = MockServer::start().await;
    mount_lookup(&api, "rustlang", "42").await;
    mount_timeline(
        &api,
        "42",
        ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1002"}, {"id": "1001"}, {"id": "1000"}]
        })),
    )
    .await;

    let hook = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/abc"))
        .and(query_param("thread_id", "7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&hook)
        .await;

    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("logs/last_tweet_id.txt");
    std::fs::create_dir_all(state_path.parent().unwrap()).unwrap();
    std::fs::write(&state_path, "1000").unwrap();

    let channel =
        WebhookChannel::new(format!("{}/api/webhooks/1/abc?thread_id=7", hook.uri())).unwrap();
    let monitor = MonitorLoop::new(
        MonitorConfig {
            run_mode: RunMode::Once,
            ..MonitorConfig::new("rustlang")
        },
        Arc::new(client(&api)),
        Arc::new(FileStateStore::new(&state_path)),
        PostNotifier::new(Arc::new(channel), "rustlang"),
        CancellationToken::new(),
    );

    let summary = monitor.run().await.unwrap();
    assert_eq!(summary.forwarded, 2);

    let bodies: Vec<serde_json::Value> = hook
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(
        bodies,
        [
            json!({"content": "New tweet from @rustlang:\nhttps://fxtwitter.com/rustlang/status/1001"}),
            json!({"content": "New tweet from @rustlang:\nhttps://fxtwitter.com/rustlang/status/1002"}),
        ]
    );
    assert_eq!(std::fs::read_to_string(&state_path).unwrap(), "1002");
}
