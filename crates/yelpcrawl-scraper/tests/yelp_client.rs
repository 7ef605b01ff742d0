//! Integration tests for `YelpClient` as a `PageFetcher`.
//!
//! Each test stands up a local `wiremock` server, so no real network traffic
//! is made.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yelpcrawl_scraper::{BrowserProfile, PageFetcher, ScraperError, YelpClient};

const TEST_AGENT: &str = "yelpcrawl-test/0.1";

fn test_client(origin: &str) -> YelpClient {
    let profile = BrowserProfile::with_user_agent(TEST_AGENT, origin).expect("valid test profile");
    YelpClient::new(5, &profile).expect("failed to build test YelpClient")
}

#[tokio::test]
async fn fetch_returns_body_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/biz/golden-boy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let body = client
        .fetch(&format!("{}/biz/golden-boy", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn fetch_sends_profile_headers() {
    let server = MockServer::start().await;
    let referer = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("user-agent", TEST_AGENT))
        .and(header("referer", referer.as_str()))
        .and(header("sec-fetch-mode", "navigate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("matched"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .fetch(&format!("{}/search?find_desc=Pizza&start=0", server.uri()))
        .await;

    assert_eq!(result.unwrap(), "matched");
}

#[tokio::test]
async fn fetch_sends_client_hints_for_rotated_chrome_identity() {
    let server = MockServer::start().await;
    let profile = BrowserProfile::rotate(&server.uri()).unwrap();
    let version = profile.chrome_version().unwrap().to_owned();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("sec-ch-ua-mobile", "?0"))
        .and(header("sec-ch-ua-platform", r#""Windows""#))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let client = YelpClient::new(5, &profile).unwrap();
    assert_eq!(client.fetch(&format!("{}/", server.uri())).await.unwrap(), "hello");

    let requests = server.received_requests().await.unwrap();
    let hints = requests[0].headers.get("sec-ch-ua").unwrap().to_str().unwrap();
    assert!(hints.contains(&format!(r#""Google Chrome";v="{version}""#)), "got: {hints}");
    let language = requests[0].headers.get("accept-language").unwrap();
    assert_eq!(language, "en-US,en;q=0.9");
}

#[tokio::test]
async fn fetch_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/biz/gone/props"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/biz/gone/props", server.uri());
    let err = test_client(&server.uri()).fetch(&url).await.unwrap_err();

    assert!(
        matches!(err, ScraperError::NotFound { url: ref u } if *u == url),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_maps_server_error_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch(&format!("{}/search?start=0", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus 503, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_maps_forbidden_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("blocked"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch(&server.uri())
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::UnexpectedStatus { status: 403, .. }));
    assert!(err.is_page_level());
}

#[tokio::test]
async fn fetch_reports_transport_failure_as_http_error() {
    // Nothing listens on port 1.
    let uri = "http://127.0.0.1:1/search?start=0";

    let err = test_client("http://127.0.0.1:1").fetch(uri).await.unwrap_err();

    assert!(matches!(err, ScraperError::Http(_)), "expected Http, got: {err:?}");
}
