use super::*;
use serde_json::json;
use serial_test::serial;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn test_config(server: &MockServer) -> ScraperConfig {
    ScraperConfig {
        endpoint: format!("{}/request", server.uri()),
        rate_limit_ms: 10,
        timeout_seconds: 5,
        max_retries: 2,
        ..ScraperConfig::default()
    }
}

#[test]
fn news_url_encodes_keyword() {
    assert_eq!(
        news_search_url("artificial intelligence"),
        "https://news.google.com/search?q=artificial+intelligence&tbs=sbd:1"
    );
    assert_eq!(
        news_search_url("c++"),
        "https://news.google.com/search?q=c%2B%2B&tbs=sbd:1"
    );
}

#[test]
fn reddit_url_encodes_keyword() {
    assert_eq!(
        reddit_search_url("rust lang"),
        "https://www.reddit.com/search/?q=rust+lang&sort=new"
    );
}

#[tokio::test]
#[serial]
async fn fetch_sends_unlocker_payload() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("POST"))
        .and(path("/request"))
        .and(header("Authorization", "Bearer bd_test"))
        .and(body_partial_json(json!({
            "zone": config.zone,
            "url": "https://news.google.com/search?q=ai&tbs=sbd:1",
            "format": "raw",
            "country": "US",
            "render": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>page</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = UnlockerClient::new(&config, "bd_test").expect("client should build");
    let body = client
        .fetch("https://news.google.com/search?q=ai&tbs=sbd:1")
        .await
        .expect("fetch should succeed");

    assert_eq!(body, "<html>page</html>");
}

#[tokio::test]
async fn fetch_retries_transient_failures() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let client = UnlockerClient::new(&config, "bd_test").expect("client should build");
    let body = client
        .fetch("https://example.com/page")
        .await
        .expect("retry should recover");

    assert_eq!(body, "recovered");
}

#[tokio::test]
async fn fetch_does_not_retry_client_errors() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = UnlockerClient::new(&config, "bd_test").expect("client should build");
    assert!(client.fetch("https://example.com/page").await.is_err());
}

#[tokio::test]
async fn fetch_rejects_non_http_urls() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    let client = UnlockerClient::new(&config, "bd_test").expect("client should build");
    assert!(client.fetch("ftp://example.com").await.is_err());
    assert!(client.fetch("").await.is_err());
}

#[tokio::test]
async fn fetch_gives_up_after_retries_are_exhausted() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let client = UnlockerClient::new(&config, "bd_test").expect("client should build");
    assert!(
        client.fetch("https://example.com/page").await.is_err(),
        "a persistent server error should fail after max_retries attempts"
    );
}

#[tokio::test]
#[serial]
async fn rate_limit_is_shared_across_clients() {
    let server = MockServer::start().await;
    let config = ScraperConfig {
        rate_limit_ms: 200,
        ..test_config(&server)
    };

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&server)
        .await;

    let first = UnlockerClient::new(&config, "bd_test").expect("client should build");
    let second = UnlockerClient::new(&config, "bd_test").expect("client should build");

    let start = std::time::Instant::now();
    first.fetch("https://example.com/a").await.expect("first fetch");
    second.fetch("https://example.com/b").await.expect("second fetch");

    assert!(
        start.elapsed() >= std::time::Duration::from_millis(200),
        "a request from a second client must wait out the interval"
    );
}

#[tokio::test]
async fn consecutive_fetches_respect_min_interval() {
    let server = MockServer::start().await;
    let config = ScraperConfig {
        rate_limit_ms: 100,
        ..test_config(&server)
    };

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&server)
        .await;

    let client = UnlockerClient::new(&config, "bd_test").expect("client should build");
    let start = std::time::Instant::now();
    client.fetch("https://example.com/a").await.expect("first fetch");
    client.fetch("https://example.com/b").await.expect("second fetch");

    assert!(
        start.elapsed() >= std::time::Duration::from_millis(100),
        "second request should wait out the rate limit"
    );
}
