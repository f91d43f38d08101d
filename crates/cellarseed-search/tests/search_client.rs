//! Integration tests for `SearchClient::fetch_segment`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test, so no real
//! network traffic is made. Covers pagination, in-call dedup, every stop
//! condition, and the retry/no-retry error taxonomy.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cellarseed_core::plan::PriceRange;
use cellarseed_core::AppConfig;
use cellarseed_search::{SearchClient, SearchError};

const ANY_PRICE: PriceRange = PriceRange {
    min: None,
    max: None,
};

fn test_config() -> AppConfig {
    AppConfig {
        rakuten_app_id: "test-app-id".to_owned(),
        rakuten_access_key: "test-access-key".to_owned(),
        rakuten_affiliate_id: None,
        rakuten_origin: "https://wine-akinator-app.vercel.app".to_owned(),
        rakuten_referer: "https://wine-akinator-app.vercel.app/".to_owned(),
        database_url: "postgres://unused".to_owned(),
        log_level: "info".to_owned(),
        db_max_connections: 5,
        db_min_connections: 1,
        db_acquire_timeout_secs: 10,
        request_timeout_secs: 5,
        // No pacing and no back-off sleeps in tests.
        request_delay_ms: 0,
        max_retries: 0,
        backoff_base_ms: 0,
    }
}

/// Client with no retries pointed at the mock server.
fn test_client(server: &MockServer) -> SearchClient {
    SearchClient::from_config(&test_config())
        .and_then(|c| c.with_endpoint(&server.uri()))
        .expect("failed to build test SearchClient")
}

/// Client with retries enabled (zero back-off) for retry-specific tests.
fn test_client_with_retries(server: &MockServer, max_retries: u32) -> SearchClient {
    let mut config = test_config();
    config.max_retries = max_retries;
    SearchClient::from_config(&config)
        .and_then(|c| c.with_endpoint(&server.uri()))
        .expect("failed to build test SearchClient")
}

/// Flat-envelope page body with the given item codes and reported totals.
fn page_json(codes: &[&str], count: u64, hits: u64) -> serde_json::Value {
    let items: Vec<serde_json::Value> = codes
        .iter()
        .map(|code| {
            json!({
                "itemCode": code,
                "itemName": format!("赤ワイン {code}"),
                "itemPrice": 1980,
                "itemUrl": format!("https://item.example/{code}")
            })
        })
        .collect();
    json!({"items": items, "count": count, "hits": hits})
}

// ---------------------------------------------------------------------------
// Happy paths: envelopes, pagination, dedup, stop conditions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_segment_returns_items_from_a_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&page_json(&["shop:1", "shop:2"], 2, 30)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 10)
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].item_code.as_deref(), Some("shop:1"));
}

#[tokio::test]
async fn fetch_segment_tolerates_the_legacy_wrapped_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "Items": [
                {"Item": {"itemCode": "shop:1", "itemName": "白ワイン"}},
                {"Item": {"itemCode": "shop:2", "itemName": "白ワイン"}}
            ],
            "Count": "2",
            "Hits": "30"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("白ワイン 750ml", "standard", ANY_PRICE, 10)
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn fetch_segment_dedups_overlapping_codes_across_pages() {
    let server = MockServer::start().await;

    // count=4, hits=2 → last page is 2. Page 2 re-serves shop:2.
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&page_json(&["shop:1", "shop:2"], 4, 2)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&page_json(&["shop:2", "shop:3"], 4, 2)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 10)
        .await
        .expect("fetch should succeed");

    let codes: Vec<&str> = items.iter().filter_map(|i| i.item_code.as_deref()).collect();
    assert_eq!(codes, vec!["shop:1", "shop:2", "shop:3"]);
}

#[tokio::test]
async fn fetch_segment_stops_at_the_target_without_fetching_more_pages() {
    let server = MockServer::start().await;

    // Totals claim many pages, but the target is satisfied by page 1.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&page_json(&["shop:1", "shop:2"], 90, 2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 2)
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn fetch_segment_caps_at_target_mid_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&page_json(&["shop:1", "shop:2", "shop:3"], 3, 30)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 1)
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 1, "result must never exceed the target");
}

#[tokio::test]
async fn fetch_segment_returns_empty_on_an_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_json(&[], 0, 30)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("ロゼワイン 750ml", "standard", ANY_PRICE, 10)
        .await
        .expect("an empty result is not an error");

    assert!(items.is_empty());
}

#[tokio::test]
async fn fetch_segment_stops_at_the_reported_last_page() {
    let server = MockServer::start().await;

    // count=2, hits=2 → page 1 is the last page even though the target
    // is unmet; no page-2 request may be issued.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&page_json(&["shop:1", "shop:2"], 2, 2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 10)
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn fetch_segment_skips_items_without_a_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "items": [
                {"itemName": "コードなし"},
                {"itemCode": "shop:1", "itemName": "赤ワイン"}
            ],
            "count": 2,
            "hits": 30
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 10)
        .await
        .expect("fetch should succeed");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_code.as_deref(), Some("shop:1"));
}

#[tokio::test]
async fn fetch_segment_sends_credentials_and_price_bounds() {
    let server = MockServer::start().await;

    // The mock only matches when every expected query param is present;
    // a mismatch falls through to wiremock's 404 and fails the fetch.
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("applicationId", "test-app-id"))
        .and(query_param("accessKey", "test-access-key"))
        .and(query_param("format", "json"))
        .and(query_param("formatVersion", "2"))
        .and(query_param("hits", "30"))
        .and(query_param("sort", "-reviewCount"))
        .and(query_param("keyword", "赤ワイン 750ml"))
        .and(query_param("minPrice", "2000"))
        .and(query_param("maxPrice", "5000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_json(&["shop:1"], 1, 30)))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .fetch_segment(
            "赤ワイン 750ml",
            "-reviewCount",
            PriceRange {
                min: Some(2_000),
                max: Some(5_000),
            },
            5,
        )
        .await
        .expect("request with full params should match the mock");

    assert_eq!(items.len(), 1);
}

// ---------------------------------------------------------------------------
// Error taxonomy: retryable, non-retryable, API-level
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_segment_retries_a_429_and_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_json(&["shop:1"], 1, 30)))
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 1);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 5)
        .await
        .expect("expected success after retry");

    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn fetch_segment_retries_a_503_and_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_json(&["shop:1"], 1, 30)))
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 1);
    let items = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 5)
        .await
        .expect("expected success after retry");

    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn fetch_segment_surfaces_the_last_error_after_exhausting_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2) // 1 initial + 1 retry
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 1);
    let result = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 5)
        .await;

    assert!(
        matches!(result, Err(SearchError::RetryableStatus { status: 429 })),
        "expected RetryableStatus(429) after exhaustion, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_segment_fails_fast_on_a_non_retryable_status_with_the_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("wrong_parameter: elements"))
        .expect(1) // must not be retried
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 3);
    let result = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 5)
        .await;

    match result {
        Err(SearchError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("wrong_parameter"), "body should be surfaced");
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_segment_fails_fast_on_an_api_level_error_payload() {
    let server = MockServer::start().await;

    // HTTP 200, but the payload encodes an error; futile to retry.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "error": "wrong_parameter",
            "error_description": "specify valid applicationId"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 3);
    let result = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 5)
        .await;

    match result {
        Err(SearchError::ApiError(message)) => {
            assert!(message.contains("wrong_parameter"), "got: {message}");
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_segment_propagates_malformed_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 3);
    let result = client
        .fetch_segment("赤ワイン 750ml", "standard", ANY_PRICE, 5)
        .await;

    assert!(
        matches!(result, Err(SearchError::Deserialize { .. })),
        "expected Deserialize error, got: {result:?}"
    );
}
