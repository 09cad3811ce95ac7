//! Contact form route handlers.
//!
//! Submissions are relayed to the shop's Telegram chat. Unlike checkout,
//! delivery is the whole point here, so failures are shown to the visitor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::PageContext;
use crate::filters;
use crate::models::flash;
use crate::services::NotificationError;
use crate::services::notify::{self, ContactDetails};
use crate::state::AppState;

/// Shown when Telegram accepted the message.
pub const SENT_MESSAGE: &str = "✅ Message sent successfully! We’ll get back to you soon.";

/// Shown when Telegram answered with a non-2xx status.
pub const REJECTED_MESSAGE: &str = "⚠️ Failed to send message. Please try again later.";

/// Shown when Telegram could not be reached or no relay is configured.
pub const UNREACHABLE_MESSAGE: &str = "❌ Error: Could not connect to the messaging service.";

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
}

/// Display the contact form.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    ContactTemplate {
        page: PageContext::load(&session, state.catalog()).await,
    }
}

/// Relay a contact form submission.
///
/// POST /send
#[instrument(skip_all, fields(subject = %form.subject))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContactDetails>,
) -> Redirect {
    let notification = notify::contact_message(&form);

    match state.notifier().send(&notification).await {
        Ok(()) => {
            tracing::info!("Contact message relayed");
            flash::success(&session, SENT_MESSAGE).await;
        }
        Err(e @ NotificationError::Api { .. }) => {
            tracing::error!(error = %e, "Contact message rejected");
            flash::danger(&session, REJECTED_MESSAGE).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Messaging service unreachable");
            flash::danger(&session, UNREACHABLE_MESSAGE).await;
        }
    }

    Redirect::to("/contact")
}
