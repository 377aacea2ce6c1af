use std::time::Duration;

use manual_engine::{
    FetchSettings, HttpPageLoader, PageFailureKind, PageLoader, SnapshotPageLoader,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn loader(settings: FetchSettings) -> HttpPageLoader {
    HttpPageLoader::new(settings).expect("client builds")
}

#[tokio::test]
async fn loads_html_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><h1>ok</h1></html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/doc", server.uri());
    let page = loader(FetchSettings::default()).load(&url).await.expect("load ok");
    assert_eq!(page.url, url);
    assert_eq!(page.html, "<html><h1>ok</h1></html>");
}

#[tokio::test]
async fn fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = loader(FetchSettings::default()).load(&url).await.unwrap_err();
    assert_eq!(err.kind, PageFailureKind::HttpStatus(404));
}

#[tokio::test]
async fn times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("<p>slow</p>", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow", server.uri());
    let err = loader(settings).load(&url).await.unwrap_err();
    assert_eq!(err.kind, PageFailureKind::Timeout);
}

#[tokio::test]
async fn rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("x".repeat(64), "text/html"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    };
    let url = format!("{}/large", server.uri());
    let err = loader(settings).load(&url).await.unwrap_err();
    assert!(matches!(
        err.kind,
        PageFailureKind::TooLarge { max_bytes: 16, .. }
    ));
}

#[tokio::test]
async fn rejects_non_html_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 8], "image/png"))
        .mount(&server)
        .await;

    let url = format!("{}/image", server.uri());
    let err = loader(FetchSettings::default()).load(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        PageFailureKind::UnsupportedContentType {
            content_type: "image/png".to_string()
        }
    );
}

#[tokio::test]
async fn invalid_url_is_reported() {
    let err = loader(FetchSettings::default())
        .load("not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, PageFailureKind::InvalidUrl);
}

#[tokio::test]
async fn snapshot_loader_serves_known_pages_only() {
    let loader = SnapshotPageLoader::new().with_page("https://a.test/x", "<p>x</p>");

    let page = loader.load("https://a.test/x").await.expect("known page");
    assert_eq!(page.html, "<p>x</p>");

    let err = loader.load("https://a.test/y").await.unwrap_err();
    assert_eq!(err.kind, PageFailureKind::Unavailable);
    assert!(err.message.contains("Receiving end does not exist"));
}
