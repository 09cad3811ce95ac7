//! 404 and 500 pages.

use std::any::Any;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::layout::PageContext;
use crate::filters;
use crate::state::AppState;

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
}

/// Server error page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub page: PageContext,
}

/// Router fallback for unknown paths.
pub async fn not_found(State(state): State<AppState>, session: Session) -> Response {
    let page = PageContext::load(&session, state.catalog()).await;
    (StatusCode::NOT_FOUND, NotFoundTemplate { page }).into_response()
}

/// 404 page without session chrome.
#[must_use]
pub fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            page: PageContext::default(),
        },
    )
        .into_response()
}

/// 500 page without session chrome.
#[must_use]
pub fn server_error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ServerErrorTemplate {
            page: PageContext::default(),
        },
    )
        .into_response()
}

/// Turn a handler panic into the 500 page.
#[allow(clippy::needless_pass_by_value)] // signature required by CatchPanicLayer
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    tracing::error!(panic = %detail, "Handler panicked");
    server_error_page()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_pages_have_matching_status() {
        assert_eq!(not_found_page().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            server_error_page().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_panic_becomes_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
