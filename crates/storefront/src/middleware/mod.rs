//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill the span field, echo `x-request-id`)
//! 4. Security headers
//! 5. Cookie-held session
//! 6. Panic catcher (render the 500 page, so it still gets the headers above)

pub mod request_id;
pub mod security_headers;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{
    CookieStore, SESSION_COOKIE_NAME, SessionCookies, cookie_session_middleware,
};
