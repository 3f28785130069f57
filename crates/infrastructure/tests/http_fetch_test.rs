use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::{CertificateSearch, RemoteListSource};
use subrecon_domain::DomainError;
use subrecon_infrastructure::http::{CrtShSearch, FetchOptions, HttpRemoteList, ResilientFetcher};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick(attempts: u32) -> FetchOptions {
    FetchOptions::new(attempts, Duration::from_millis(5), Duration::from_secs(2))
}

// ============================================================================
// ResilientFetcher Tests
// ============================================================================

#[tokio::test]
async fn test_retries_server_error_then_succeeds() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;
    let fetcher = ResilientFetcher::new(2);

    // Act
    let body = fetcher
        .get_text(&format!("{}/list", server.uri()), &[], quick(3))
        .await
        .unwrap();

    // Assert
    assert_eq!(body, "ok");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_honors_retry_after_on_429() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let body = ResilientFetcher::new(1)
        .get_text(&server.uri(), &[], quick(2))
        .await
        .unwrap();

    assert_eq!(body, "done");
}

#[tokio::test]
async fn test_last_response_is_returned_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let response = ResilientFetcher::new(1)
        .get(&server.uri(), &[], quick(2))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = ResilientFetcher::new(1)
        .get_text(&server.uri(), &[], quick(3))
        .await;

    assert!(matches!(result, Err(DomainError::HttpStatus { status: 404, .. })));
}

#[tokio::test]
async fn test_timeout_surfaces_after_last_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let options = FetchOptions::new(1, Duration::from_millis(5), Duration::from_millis(50));
    let result = ResilientFetcher::new(1).get(&server.uri(), &[], options).await;

    assert!(matches!(result, Err(DomainError::TransportTimeout { .. })));
}

#[tokio::test]
async fn test_sends_default_and_extra_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "domain-checker/1.0"))
        .and(header("accept", "text/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hi"))
        .expect(1)
        .mount(&server)
        .await;

    let body = ResilientFetcher::new(1)
        .get_text(&server.uri(), &[("accept", "text/html")], quick(1))
        .await
        .unwrap();

    assert_eq!(body, "hi");
}

// ============================================================================
// Adapters
// ============================================================================

#[tokio::test]
async fn test_remote_list_fetches_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains.lst"))
        .respond_with(ResponseTemplate::new(200).set_body_string("blocked.example\n"))
        .mount(&server)
        .await;
    let list = HttpRemoteList::new(Arc::new(ResilientFetcher::new(1)), Duration::from_secs(2));

    let text = list
        .fetch_text(&format!("{}/domains.lst", server.uri()))
        .await
        .unwrap();

    assert_eq!(text, "blocked.example\n");
}

#[tokio::test]
async fn test_crtsh_search_parses_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "93.184.216.34"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"common_name": "www.example.com", "name_value": "www.example.com\nexample.com"},
            {"common_name": "cdn.example.com"}
        ])))
        .mount(&server)
        .await;
    let search = CrtShSearch::new(
        Arc::new(ResilientFetcher::new(1)),
        format!("{}/", server.uri()),
        Duration::from_secs(2),
    );

    let rows = search.search("93.184.216.34").await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].common_name.as_deref(), Some("cdn.example.com"));
    assert!(rows[1].name_value.is_none());
}

#[tokio::test]
async fn test_crtsh_search_empty_body_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let search = CrtShSearch::new(
        Arc::new(ResilientFetcher::new(1)),
        format!("{}/", server.uri()),
        Duration::from_secs(2),
    );

    assert!(search.search("10.0.0.1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_crtsh_search_propagates_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let search = CrtShSearch::new(
        Arc::new(ResilientFetcher::new(1)),
        format!("{}/", server.uri()),
        Duration::from_secs(2),
    );

    let result = search.search("10.0.0.1").await;

    assert!(matches!(result, Err(DomainError::HttpStatus { status: 502, .. })));
}
