//! End-to-end test harness for the Threadline storefront.
//!
//! Each test spawns its own storefront on an ephemeral port and talks to it
//! over real HTTP with a cookie-aware client, so the encrypted session
//! cookie round-trips exactly as it would in a browser. Outbound Telegram
//! calls go to [`MockTelegram`], a tiny local server that records what it
//! receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadline-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
};
use reqwest::{
    Client, Response,
    header::{COOKIE, LOCATION, SET_COOKIE},
    redirect::Policy,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use threadline_storefront::catalog::Catalog;
use threadline_storefront::config::{StorefrontConfig, TelegramConfig};
use threadline_storefront::middleware::SESSION_COOKIE_NAME;
use threadline_storefront::routes::{pages, with_middleware};
use threadline_storefront::state::AppState;

/// Session key material used by every test server.
const TEST_SESSION_SECRET: &str = "k9Qz4vT1mW8pXr2LbN6dHs0JfYc3GaUe";

/// A running storefront plus a client holding one visitor's cookies.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

impl TestApp {
    /// Spawn a storefront with no notification destination.
    pub async fn spawn() -> Self {
        Self::spawn_with(None).await
    }

    /// Spawn a storefront that relays notifications to `telegram`.
    pub async fn spawn_with(telegram: Option<TelegramConfig>) -> Self {
        Self::launch(test_config(telegram), pages()).await
    }

    /// Spawn a storefront serving `router` behind the full middleware stack.
    pub async fn spawn_router(router: Router<AppState>) -> Self {
        Self::launch(test_config(None), router).await
    }

    /// Spawn a storefront from an explicit configuration and router.
    ///
    /// # Panics
    ///
    /// Panics if the server or client can't be started.
    pub async fn launch(config: StorefrontConfig, router: Router<AppState>) -> Self {
        let state = AppState::new(config, Catalog::default()).expect("state builds");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, with_middleware(router, state))
                .await
                .expect("storefront server");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path without following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// GET a path and return the body, asserting a 2xx status.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the status isn't successful.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert!(
            response.status().is_success(),
            "GET {path} returned {}",
            response.status()
        );
        response.text().await.expect("body")
    }

    /// POST a form without following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// POST a form, assert a 303, and return the redirect target.
    ///
    /// # Panics
    ///
    /// Panics if the response isn't a See Other redirect.
    pub async fn submit(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self.post_form(path, form).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::SEE_OTHER,
            "POST {path} should redirect"
        );
        location(&response)
    }

    /// GET a path presenting `cookie` instead of this client's own jar.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Response {
        Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client")
            .get(self.url(path))
            .header(COOKIE, cookie)
            .send()
            .await
            .expect("GET request")
    }

    /// Add `quantity` of a product to this visitor's cart.
    pub async fn add_to_cart(&self, product_id: &str, quantity: &str) -> String {
        self.submit(
            "/cart/add",
            &[("product_id", product_id), ("quantity", quantity)],
        )
        .await
    }
}

/// Storefront configuration used by every test server.
#[must_use]
pub fn test_config(telegram: Option<TelegramConfig>) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        session_secret: SecretString::from(TEST_SESSION_SECRET),
        secure_cookies: false,
        telegram,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The `name=value` pair of the session cookie a response sets.
///
/// # Panics
///
/// Panics if the response sets no session cookie.
pub fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE_NAME))
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string()
}

/// The `Location` header of a redirect.
///
/// # Panics
///
/// Panics if the header is missing.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Location header")
        .to_string()
}

/// One request received by [`MockTelegram`].
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub path: String,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    received: Arc<Mutex<Vec<ReceivedMessage>>>,
}

/// Local stand-in for the Telegram Bot API.
pub struct MockTelegram {
    pub api_base: String,
    received: Arc<Mutex<Vec<ReceivedMessage>>>,
}

impl MockTelegram {
    /// Bot token the mock expects in request paths.
    pub const TOKEN: &'static str = "4242:test-token";

    /// Chat ID handed to the storefront.
    pub const CHAT_ID: &'static str = "@threadline_orders";

    /// Start a mock that answers every request with `status`.
    ///
    /// # Panics
    ///
    /// Panics if the listener can't be bound.
    pub async fn start(status: StatusCode) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            received: Arc::clone(&received),
        };

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock telegram");
        let addr = listener.local_addr().expect("local addr");
        let router = Router::new().fallback(record).with_state(state);
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server");
        });

        Self {
            api_base: format!("http://{addr}"),
            received,
        }
    }

    /// Storefront configuration pointing at this mock.
    #[must_use]
    pub fn config(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: SecretString::from(Self::TOKEN),
            chat_id: Self::CHAT_ID.to_string(),
            api_base: self.api_base.clone(),
        }
    }

    /// Everything received so far.
    ///
    /// # Panics
    ///
    /// Panics if the recording lock is poisoned.
    #[must_use]
    pub fn messages(&self) -> Vec<ReceivedMessage> {
        self.received.lock().expect("lock").clone()
    }
}

async fn record(State(state): State<MockState>, request: Request) -> impl IntoResponse {
    let path = request.uri().path().to_string();
    let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    state
        .received
        .lock()
        .expect("lock")
        .push(ReceivedMessage { path, body });

    let reply = if state.status.is_success() {
        json!({"ok": true, "result": {"message_id": 1}})
    } else {
        json!({
            "ok": false,
            "error_code": state.status.as_u16(),
            "description": "Bad Request: chat not found",
        })
    };
    (state.status, Json(reply))
}

/// Telegram configuration pointing at a port nothing listens on.
///
/// # Panics
///
/// Panics if no ephemeral port can be reserved.
pub async fn unreachable_telegram() -> TelegramConfig {
    let addr: SocketAddr = {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("reserve port");
        listener.local_addr().expect("local addr")
    };

    TelegramConfig {
        bot_token: SecretString::from(MockTelegram::TOKEN),
        chat_id: MockTelegram::CHAT_ID.to_string(),
        api_base: format!("http://{addr}"),
    }
}
