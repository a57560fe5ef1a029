//! Integration tests for `ApifyClient::fetch_profile_videos`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelscope_scraper::{ApifyClient, ScraperError};

const RUN_SYNC_PATH: &str =
    "/v2/acts/clockworks~tiktok-profile-scraper/run-sync-get-dataset-items";

/// Builds an `ApifyClient` for tests: 5-second timeout, no retries.
fn test_client(server: &MockServer) -> ApifyClient {
    ApifyClient::with_base_url(
        "apify_api_test",
        "clockworks/tiktok-profile-scraper",
        5,
        "reelscope-test/0.1",
        &server.uri(),
    )
    .expect("failed to build test ApifyClient")
}

#[tokio::test]
async fn fetch_profile_videos_posts_actor_input_and_returns_items() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .and(header("authorization", "Bearer apify_api_test"))
        .and(body_json(json!({
            "profiles": ["creator"],
            "resultsPerPage": 30,
            "shouldDownloadVideos": false,
            "shouldDownloadCovers": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"id": "1", "playCount": 100},
            {"video": {"id": "2"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = test_client(&server)
        .fetch_profile_videos("creator", 30)
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["playCount"], json!(100));
}

#[tokio::test]
async fn fetch_profile_videos_returns_empty_vec_for_empty_dataset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let items = test_client(&server)
        .fetch_profile_videos("creator", 30)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn fetch_profile_videos_maps_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"type": "token-not-valid", "message": "Authentication token is not valid."}
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_profile_videos("creator", 30)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::Unauthorized { status: 401 }),
        "expected Unauthorized, got: {err:?}"
    );
    assert!(!err.to_string().contains("apify_api_test"));
}

#[tokio::test]
async fn fetch_profile_videos_maps_unknown_actor_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_profile_videos("creator", 30)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_profile_videos_reports_rate_limit_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_profile_videos("creator", 30)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::RateLimited { retry_after_secs: 12 }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_profile_videos_rejects_non_array_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_profile_videos("creator", 30)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_profile_videos_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": "1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).with_retry_policy(2, 0);
    let items = client.fetch_profile_videos("creator", 10).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn fetch_profile_videos_without_retries_surfaces_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_profile_videos("creator", 30)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScraperError::UnexpectedStatus { status: 502, .. }
    ));
}
