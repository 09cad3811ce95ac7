//! Contact form relay: delivery failures are reported to the visitor.

use axum::http::StatusCode;
use threadline_integration_tests::{MockTelegram, TestApp, unreachable_telegram};

const FORM: &[(&str, &str)] = &[
    ("full_name", "Dara Quinn"),
    ("email", "dara@example.com"),
    ("phone", "+1 555 0100"),
    ("subject", "Sizing"),
    ("message", "Do the jeans run <small>?"),
];

const SENT: &str = "✅ Message sent successfully! We’ll get back to you soon.";
const REJECTED: &str = "⚠️ Failed to send message. Please try again later.";
const UNREACHABLE: &str = "❌ Error: Could not connect to the messaging service.";

#[tokio::test]
async fn test_contact_page_renders_form() {
    let app = TestApp::spawn().await;
    let html = app.page("/contact").await;

    assert!(html.contains("action=\"/send\""));
    for field in ["full_name", "email", "phone", "subject", "message"] {
        assert!(html.contains(&format!("name=\"{field}\"")), "missing {field}");
    }
}

#[tokio::test]
async fn test_contact_message_is_relayed() {
    let telegram = MockTelegram::start(StatusCode::OK).await;
    let app = TestApp::spawn_with(Some(telegram.config())).await;

    assert_eq!(app.submit("/send", FORM).await, "/contact");

    let messages = telegram.messages();
    assert_eq!(messages.len(), 1);
    let body = &messages[0].body;
    assert_eq!(body["chat_id"], MockTelegram::CHAT_ID);
    assert_eq!(body["parse_mode"], "HTML");
    let text = body["text"].as_str().expect("text");
    assert!(text.contains("<b>Name:</b> Dara Quinn"));
    assert!(text.contains("<b>Email:</b> dara@example.com"));
    assert!(text.contains("<b>Message:</b> Do the jeans run &lt;small&gt;?"));

    assert!(app.page("/contact").await.contains(SENT));
}

#[tokio::test]
async fn test_rejected_message_is_reported_and_cart_kept() {
    let telegram = MockTelegram::start(StatusCode::BAD_REQUEST).await;
    let app = TestApp::spawn_with(Some(telegram.config())).await;
    app.add_to_cart("3", "2").await;

    assert_eq!(app.submit("/send", FORM).await, "/contact");

    let html = app.page("/contact").await;
    assert!(html.contains(REJECTED));
    assert!(!html.contains(SENT));
    assert!(html.contains("<span class=\"badge\">2</span>"));
    assert!(app.page("/cart").await.contains("$99.98"));
}

#[tokio::test]
async fn test_unreachable_service_is_reported_and_cart_kept() {
    let app = TestApp::spawn_with(Some(unreachable_telegram().await)).await;
    app.add_to_cart("1", "1").await;

    assert_eq!(app.submit("/send", FORM).await, "/contact");

    let html = app.page("/contact").await;
    assert!(html.contains(UNREACHABLE));
    assert!(!html.contains(REJECTED));
    assert!(html.contains("<span class=\"badge\">1</span>"));
}

#[tokio::test]
async fn test_unconfigured_relay_is_reported() {
    let app = TestApp::spawn().await;

    assert_eq!(app.submit("/send", FORM).await, "/contact");

    let html = app.page("/contact").await;
    assert!(html.contains(UNREACHABLE));
    assert!(!html.contains(REJECTED));
}

#[tokio::test]
async fn test_partial_form_is_still_relayed() {
    let telegram = MockTelegram::start(StatusCode::OK).await;
    let app = TestApp::spawn_with(Some(telegram.config())).await;

    app.submit("/send", &[("message", "Hello")]).await;

    let messages = telegram.messages();
    assert_eq!(messages.len(), 1);
    let text = messages[0].body["text"].as_str().expect("text");
    assert!(text.contains("<b>Message:</b> Hello"));
}
