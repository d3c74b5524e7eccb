// Tavily provider against a local HTTP server
// Verifies the request body sent for each scraping intent, the one-call-per-search
// guarantee and the mapping of every failure onto ProviderRequestFailed.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use fabstir_rag_core::search::{
    SearchConfig, SearchError, SearchOptions, SearchProvider, TavilySearchProvider,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct MockTavily {
    status: StatusCode,
    body: String,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

async fn handle_search(
    State(mock): State<MockTavily>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    mock.requests.lock().unwrap().push(body);
    if let Some(auth) = headers.get("authorization") {
        mock.auth
            .lock()
            .unwrap()
            .push(auth.to_str().unwrap().to_string());
    }
    tokio::time::sleep(mock.delay).await;
    (mock.status, mock.body.clone())
}

async fn spawn_mock(status: StatusCode, body: String, delay: Duration) -> (String, MockTavily) {
    let mock = MockTavily {
        status,
        body,
        delay,
        hits: Arc::new(AtomicUsize::new(0)),
        requests: Arc::new(Mutex::new(Vec::new())),
        auth: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/search", post(handle_search))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/search", addr), mock)
}

fn results_body(count: usize) -> String {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "url": format!("https://example.com/{}", i),
                "title": format!("Result {}", i),
                "description": format!("Description {}", i),
                "content": format!("Content {}", i),
                "markdown": format!("# Result {}", i),
            })
        })
        .collect();
    json!({ "results": results }).to_string()
}

fn provider_for(endpoint: &str, timeout_ms: u64, max_chunks: u32) -> TavilySearchProvider {
    let config = SearchConfig {
        tavily_api_key: Some("tvly-test".to_string()),
        endpoint: endpoint.to_string(),
        request_timeout_ms: timeout_ms,
        max_results_cap: 20,
        max_chunks_per_source: max_chunks,
    };
    TavilySearchProvider::new("tvly-test".to_string(), &config).unwrap()
}

#[tokio::test]
async fn test_scrape_request_shape() {
    let (endpoint, mock) = spawn_mock(StatusCode::OK, results_body(2), Duration::ZERO).await;
    let provider = provider_for(&endpoint, 5000, 10);

    let options = SearchOptions {
        max_results: 50,
        ..SearchOptions::scraping()
    };
    let results = provider.search("rust ownership", &options).await.unwrap();

    let requests = mock.requests.lock().unwrap();
    let body = &requests[0];
    assert_eq!(body["query"], "rust ownership");
    assert_eq!(body["include_content"], true);
    assert_eq!(body["search_depth"], "advanced");
    assert_eq!(body["chunks_per_source"], 5);
    assert_eq!(body["max_results"], 20);
    assert!(body.get("include_domains").is_none());
    assert!(body.get("start_published_date").is_none());

    assert_eq!(results[0].content.as_deref(), Some("Content 0"));
    assert_eq!(results[0].markdown.as_deref(), Some("# Result 0"));
    assert_eq!(mock.auth.lock().unwrap()[0], "Bearer tvly-test");
}

#[tokio::test]
async fn test_scrape_chunks_capped_by_provider() {
    let (endpoint, mock) = spawn_mock(StatusCode::OK, results_body(1), Duration::ZERO).await;
    let provider = provider_for(&endpoint, 5000, 3);

    provider
        .search("rust", &SearchOptions::scraping())
        .await
        .unwrap();

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests[0]["chunks_per_source"], 3);
    assert_eq!(requests[0]["search_depth"], "advanced");
}

#[tokio::test]
async fn test_basic_request_drops_content() {
    let (endpoint, mock) = spawn_mock(StatusCode::OK, results_body(3), Duration::ZERO).await;
    let provider = provider_for(&endpoint, 5000, 10);

    let options = SearchOptions {
        include_domains: vec!["docs.rs".to_string()],
        end_published_date: Some("2025-06-30".to_string()),
        ..SearchOptions::default()
    };
    let results = provider.search("tokio", &options).await.unwrap();

    let requests = mock.requests.lock().unwrap();
    let body = &requests[0];
    assert_eq!(body["include_content"], false);
    assert_eq!(body["search_depth"], "basic");
    assert_eq!(body["chunks_per_source"], 3);
    assert_eq!(body["include_domains"], json!(["docs.rs"]));
    assert_eq!(body["end_published_date"], "2025-06-30");
    assert!(body.get("exclude_domains").is_none());
    assert!(body.get("start_published_date").is_none());

    // Provider order kept, scraped fields withheld
    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/0",
            "https://example.com/1",
            "https://example.com/2"
        ]
    );
    assert!(results.iter().all(|r| r.content.is_none() && r.markdown.is_none()));
}

#[tokio::test]
async fn test_one_call_per_search() {
    let (endpoint, mock) = spawn_mock(StatusCode::OK, results_body(20), Duration::ZERO).await;
    let provider = provider_for(&endpoint, 5000, 10);

    let results = provider
        .search("many results", &SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 20);
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);

    provider
        .search("again", &SearchOptions::scraping())
        .await
        .unwrap();
    assert_eq!(mock.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_results_are_success() {
    let (endpoint, mock) = spawn_mock(StatusCode::OK, results_body(0), Duration::ZERO).await;
    let provider = provider_for(&endpoint, 5000, 10);

    let results = provider
        .search("nothing", &SearchOptions::default())
        .await
        .unwrap();
    assert!(results.is_empty());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_error_status_is_not_retried() {
    let (endpoint, mock) = spawn_mock(
        StatusCode::TOO_MANY_REQUESTS,
        "slow down".to_string(),
        Duration::ZERO,
    )
    .await;
    let provider = provider_for(&endpoint, 5000, 10);

    let err = provider
        .search("rust", &SearchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SearchError::ProviderRequestFailed {
            provider: "tavily".to_string(),
            status: Some(429),
            message: "slow down".to_string(),
        }
    );
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_body_is_request_failure() {
    let (endpoint, _mock) =
        spawn_mock(StatusCode::OK, "<html>oops</html>".to_string(), Duration::ZERO).await;
    let provider = provider_for(&endpoint, 5000, 10);

    match provider.search("rust", &SearchOptions::default()).await {
        Err(SearchError::ProviderRequestFailed {
            status, message, ..
        }) => {
            assert_eq!(status, Some(200));
            assert!(message.contains("JSON parse error"));
        }
        other => panic!("expected ProviderRequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_is_request_failure() {
    let (endpoint, _mock) =
        spawn_mock(StatusCode::OK, results_body(1), Duration::from_millis(500)).await;
    let provider = provider_for(&endpoint, 50, 10);

    match provider.search("rust", &SearchOptions::default()).await {
        Err(SearchError::ProviderRequestFailed {
            status, message, ..
        }) => {
            assert_eq!(status, None);
            assert!(message.contains("timed out"));
        }
        other => panic!("expected ProviderRequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_request_failure() {
    // Nothing listens on port 1
    let provider = provider_for("http://127.0.0.1:1/search", 2000, 10);

    let err = provider
        .search("rust", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::ProviderRequestFailed { status: None, .. }
    ));
}

#[tokio::test]
async fn test_invalid_options_make_no_call() {
    let (endpoint, mock) = spawn_mock(StatusCode::OK, results_body(1), Duration::ZERO).await;
    let provider = provider_for(&endpoint, 5000, 10);

    let options = SearchOptions {
        start_published_date: Some("2025-13-40".to_string()),
        ..SearchOptions::default()
    };
    let err = provider.search("rust", &options).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidOptions { .. }));
    assert_eq!(mock.hits.load(Ordering::SeqCst), 0);
}
