//! Unit tests for the metadata extractor against a local mock HTTP server.

use std::time::{Duration, Instant};

use linkvault::services::metadata_extractor::{parse_metadata, MetadataExtractor};
use linkvault::types::errors::ExtractError;
use linkvault::types::settings::MetadataSettings;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup(timeout_ms: u64) -> MetadataExtractor {
    MetadataExtractor::new(&MetadataSettings {
        timeout_ms,
        ..MetadataSettings::default()
    })
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

/// A page with only a `<title>` yields the title and the default favicon.
#[tokio::test]
async fn test_title_only_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(html("<html><head><title>Example</title></head><body></body></html>"))
        .mount(&server)
        .await;

    let url = format!("{}/article", server.uri());
    let meta = setup(5_000).extract(&url).await.expect("metadata expected");

    assert_eq!(meta.title.as_deref(), Some("Example"));
    assert_eq!(meta.description, None);
    assert_eq!(meta.image, None);
    assert_eq!(meta.favicon, Some(format!("{}/favicon.ico", server.uri())));
}

/// Open Graph values win over the fallbacks and relative URLs are resolved.
#[tokio::test]
async fn test_open_graph_page() {
    let server = MockServer::start().await;
    let page = r#"<html><head>
        <title>Plain title</title>
        <meta property="og:title" content="  OG title  ">
        <meta property="og:description" content="OG description">
        <meta name="description" content="Meta description">
        <meta property="og:image" content="/img/cover.png">
        <link rel="icon" href="/static/icon.svg">
        </head></html>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(page))
        .mount(&server)
        .await;

    let meta = setup(5_000).extract(&server.uri()).await.expect("metadata expected");

    assert_eq!(meta.title.as_deref(), Some("OG title"));
    assert_eq!(meta.description.as_deref(), Some("OG description"));
    assert_eq!(meta.image, Some(format!("{}/img/cover.png", server.uri())));
    assert_eq!(meta.favicon, Some(format!("{}/static/icon.svg", server.uri())));
}

/// The configured User-Agent is sent.
#[tokio::test]
async fn test_sends_bot_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "Mozilla/5.0 (compatible; BookmarkBot/1.0)"))
        .respond_with(html("<title>ok</title>"))
        .expect(1)
        .mount(&server)
        .await;

    let meta = setup(5_000).extract(&server.uri()).await;
    assert!(meta.is_some());
}

/// A slow server produces `None` within roughly the configured bound.
#[tokio::test]
async fn test_timeout_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<title>late</title>").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let extractor = setup(200);
    let started = Instant::now();
    let result = extractor.try_extract(&server.uri()).await;

    assert!(matches!(result, Err(ExtractError::Timeout(200))));
    assert!(started.elapsed() < Duration::from_secs(2));
}

/// Nothing listening on the port: `None`, no panic.
#[tokio::test]
async fn test_unreachable_host_returns_none() {
    let meta = setup(2_000).extract("http://127.0.0.1:1/").await;
    assert!(meta.is_none());
}

#[tokio::test]
async fn test_non_success_status_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = setup(5_000).try_extract(&server.uri()).await;
    assert!(matches!(result, Err(ExtractError::Status(404))));
}

#[tokio::test]
async fn test_non_html_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "title": "json" })))
        .mount(&server)
        .await;

    let result = setup(5_000).try_extract(&server.uri()).await;
    assert!(matches!(result, Err(ExtractError::NotHtml(_))));
}

#[tokio::test]
async fn test_malformed_url_returns_none() {
    let extractor = setup(5_000);
    assert!(extractor.extract("not a url").await.is_none());
    assert!(matches!(
        extractor.try_extract("ftp://example.com/file").await,
        Err(ExtractError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn test_disabled_extractor_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<title>x</title>"))
        .expect(0)
        .mount(&server)
        .await;

    let extractor = MetadataExtractor::new(&MetadataSettings {
        enabled: false,
        ..MetadataSettings::default()
    });
    assert!(matches!(
        extractor.try_extract(&server.uri()).await,
        Err(ExtractError::Disabled)
    ));
}

/// Bodies larger than the cap are cut, and whatever head survives is parsed.
#[tokio::test]
async fn test_body_is_capped() {
    let server = MockServer::start().await;
    let page = format!("<html><head><title>Big</title></head><body>{}</body></html>", "x".repeat(64 * 1024));
    Mock::given(method("GET"))
        .respond_with(html(&page))
        .mount(&server)
        .await;

    let extractor = MetadataExtractor::new(&MetadataSettings {
        max_body_bytes: 1024,
        ..MetadataSettings::default()
    });
    let meta = extractor.extract(&server.uri()).await.expect("metadata expected");
    assert_eq!(meta.title.as_deref(), Some("Big"));
}

// === parse_metadata ===

#[test]
fn test_parse_twitter_fallbacks() {
    let base = Url::parse("https://example.com/post").unwrap();
    let doc = r#"<head>
        <meta name="twitter:title" content="Tweet title">
        <meta name="twitter:image" content="https://cdn.example.com/t.png">
        <link rel="shortcut icon" href="/legacy.ico">
        </head>"#;
    let meta = parse_metadata(doc, &base);

    assert_eq!(meta.title.as_deref(), Some("Tweet title"));
    assert_eq!(meta.image.as_deref(), Some("https://cdn.example.com/t.png"));
    assert_eq!(meta.favicon.as_deref(), Some("https://example.com/legacy.ico"));
}

#[test]
fn test_parse_tolerates_broken_markup() {
    let base = Url::parse("https://example.com/").unwrap();
    let meta = parse_metadata("<html><head><title>Unclosed<meta name=", &base);
    assert_eq!(meta.favicon.as_deref(), Some("https://example.com/favicon.ico"));
}

#[test]
fn test_parse_empty_document() {
    let base = Url::parse("https://example.com/a/b").unwrap();
    let meta = parse_metadata("", &base);
    assert_eq!(meta.title, None);
    assert_eq!(meta.description, None);
    assert_eq!(meta.image, None);
    assert_eq!(meta.favicon.as_deref(), Some("https://example.com/favicon.ico"));
}
