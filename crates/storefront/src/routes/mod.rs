//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog listing
//! GET  /product/{id}           - Product detail
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart, redirect back
//! POST /cart/remove            - Remove line, redirect to /cart
//! POST /checkout               - Place order, redirect to /
//!
//! # Contact
//! GET  /contact                - Contact form
//! POST /send                   - Relay contact message, redirect to /contact
//!
//! GET  /static/*               - Stylesheet and assets
//! *                            - 404 page
//! ```

pub mod cart;
pub mod contact;
pub mod errors;
pub mod layout;
pub mod products;

use axum::{
    Router,
    extract::Request,
    middleware,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    SessionCookies, cookie_session_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

pub use layout::PageContext;

/// Directory holding the stylesheet.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/product/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/contact", get(contact::show))
        .route("/send", post(contact::send))
}

/// Every page and asset route, with the 404 fallback.
pub fn pages() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(errors::not_found)
}

/// Wrap `router` in the storefront middleware stack and bind the state.
///
/// The panic catcher sits innermost so the 500 page it renders still passes
/// through the session, security-header and request-id layers.
pub fn with_middleware(router: Router<AppState>, state: AppState) -> Router {
    let session_cookies = SessionCookies::new(state.config());

    router
        .layer(CatchPanicLayer::custom(errors::handle_panic))
        .layer(middleware::from_fn_with_state(
            session_cookies,
            cookie_session_middleware,
        ))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Build the complete application: routes, fallback, and middleware stack.
pub fn app(state: AppState) -> Router {
    with_middleware(pages(), state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
