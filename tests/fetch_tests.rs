//! HTTP fetcher tests against a local mock server

use inkcrawl::config::FetchConfig;
use inkcrawl::{ContentFetcher, Fetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> ContentFetcher {
    ContentFetcher::new(&FetchConfig::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_html_page() {
    let server = MockServer::start().await;
    let html = r#"<html><head><title>Widget Guide</title></head>
        <body><nav>menu</nav><p>All about widgets.</p></body></html>"#;
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/guide", server.uri())).await;

    assert!(!outcome.is_failure());
    assert_eq!(outcome.title.as_deref(), Some("Widget Guide"));
    assert_eq!(outcome.text, "All about widgets.");
    assert!(outcome.raw_html.is_some());
}

#[tokio::test]
async fn test_fetch_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/missing", server.uri())).await;

    assert!(outcome.is_failure());
    assert_eq!(outcome.error.as_deref(), Some("HTTP 404"));
    assert!(outcome.text.is_empty());
    assert!(outcome.raw_html.is_none());
}

#[tokio::test]
async fn test_fetch_non_html_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"k\": 1}", "application/json"),
        )
        .mount(&server)
        .await;

    let outcome = fetcher().fetch(&format!("{}/data.json", server.uri())).await;

    assert!(outcome.is_failure());
    assert!(outcome
        .error
        .unwrap()
        .contains("Non-HTML content type: application/json"));
}

#[tokio::test]
async fn test_fetch_untitled_page_falls_back_to_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><p>no title here</p></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/bare", server.uri());
    let outcome = fetcher().fetch(&url).await;

    assert!(!outcome.is_failure());
    assert_eq!(outcome.title.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Nothing listens on this port
    let outcome = fetcher().fetch("http://127.0.0.1:1/page").await;

    assert!(outcome.is_failure());
    assert!(outcome.error.unwrap().contains("Connection error"));
}
