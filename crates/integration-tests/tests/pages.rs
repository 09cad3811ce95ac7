//! Page chrome: health, error pages, static assets, response headers.

use axum::routing::get;
use reqwest::{StatusCode, header::CONTENT_TYPE};
use threadline_integration_tests::TestApp;
use threadline_storefront::routes::pages;

fn assert_security_headers(response: &reqwest::Response, what: &str) {
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff", "{what}");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN", "{what}");
    assert!(headers.contains_key("content-security-policy"), "{what}");
    assert!(headers.contains_key("x-request-id"), "{what}");
}

#[allow(clippy::unused_async)]
async fn explode() -> &'static str {
    panic!("handler blew up")
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_unknown_path_renders_404_page() {
    let app = TestApp::spawn().await;
    let response = app.get("/does/not/exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = response.text().await.expect("body");
    assert!(html.contains("Page not found"));
    assert!(html.contains("href=\"/cart\""));
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let app = TestApp::spawn().await;
    let response = app.get("/static/css/main.css").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .expect("ascii")
            .starts_with("text/css")
    );
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::spawn().await;

    for path in ["/", "/cart", "/contact", "/product/1", "/product/99", "/nope", "/health"] {
        let response = app.get(path).await;
        assert_security_headers(&response, path);
    }

    let response = app
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "1")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_security_headers(&response, "POST /cart/add");

    let response = app.post_form("/checkout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_security_headers(&response, "POST /checkout");
}

#[tokio::test]
async fn test_security_headers_on_rejected_form() {
    let app = TestApp::spawn().await;
    let response = app
        .client
        .post(format!("{}/send", app.base_url))
        .header(CONTENT_TYPE, "application/json")
        .body("{}")
        .send()
        .await
        .expect("POST request");

    assert!(response.status().is_client_error());
    assert_security_headers(&response, "rejected form");
}

#[tokio::test]
async fn test_panic_renders_500_page_with_security_headers() {
    let app = TestApp::spawn_router(pages().route("/explode", get(explode))).await;
    let response = app.get("/explode").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_security_headers(&response, "panic");
    let html = response.text().await.expect("body");
    assert!(html.contains("Something went wrong"));

    // The server keeps serving after a handler panic.
    assert_eq!(app.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_footer_shows_current_year() {
    let app = TestApp::spawn().await;
    let html = app.page("/").await;

    assert!(html.contains("Threadline"));
    assert!(html.contains("&copy; 20"));
}
