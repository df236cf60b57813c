//! HTTP fetcher behavior against a mock server

use pantry_harvest::config::FetchConfig;
use pantry_harvest::crawler::{FetchErrorKind, HttpFetcher, PageFetcher};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(timeout_secs: u64) -> HttpFetcher {
    HttpFetcher::new(&FetchConfig {
        timeout_secs,
        ..FetchConfig::default()
    })
    .expect("Failed to build client")
}

#[tokio::test]
async fn test_fetch_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipe/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>두부조림</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetcher(5)
        .fetch(&format!("{}/recipe/1", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "<html>두부조림</html>");
}

#[tokio::test]
async fn test_non_success_status_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = fetcher(5);

    let missing = fetcher.fetch(&format!("{}/missing", server.uri())).await.unwrap_err();
    assert_eq!(missing.kind, FetchErrorKind::HttpStatus(404));
    assert!(!missing.kind.is_retryable());

    let busy = fetcher.fetch(&format!("{}/busy", server.uri())).await.unwrap_err();
    assert_eq!(busy.kind, FetchErrorKind::HttpStatus(503));
    assert!(busy.kind.is_retryable());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = fetcher(1).fetch(&server.uri()).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Timeout);
}

#[tokio::test]
async fn test_refused_connection_is_classified() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = fetcher(2).fetch(&format!("{}/recipe/1", uri)).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Connect);
}
