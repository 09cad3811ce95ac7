//! One-shot flash messages.
//!
//! A handler queues a message before redirecting; the next rendered page
//! drains the queue, so each message is displayed exactly once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

/// Visual category of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    /// CSS modifier class used by the templates.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Danger => "flash-danger",
        }
    }
}

/// A single queued message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    #[must_use]
    pub fn new(level: FlashLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Queue a message for the next rendered page.
///
/// Session store failures are logged; a lost flash never fails the request.
pub async fn push(session: &Session, message: FlashMessage) {
    let mut queue = session
        .get::<Vec<FlashMessage>>(keys::FLASHES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    queue.push(message);

    if let Err(e) = session.insert(keys::FLASHES, queue).await {
        tracing::error!("Failed to store flash message in session: {e}");
    }
}

/// Queue a success message.
pub async fn success(session: &Session, text: impl Into<String>) {
    push(session, FlashMessage::new(FlashLevel::Success, text)).await;
}

/// Queue an error message.
pub async fn danger(session: &Session, text: impl Into<String>) {
    push(session, FlashMessage::new(FlashLevel::Danger, text)).await;
}

/// Drain all pending messages.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    match session.remove::<Vec<FlashMessage>>(keys::FLASHES).await {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read flash messages from session: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;


    use super::*;
    use crate::middleware::CookieStore;

    fn session() -> Session {
        Session::new(None, Arc::new(CookieStore::default()), None)
    }

    #[tokio::test]
    async fn test_take_drains_queue_once() {
        let session = session();
        success(&session, "Added Denim Blue Jeans to cart.").await;
        danger(&session, "Your cart is empty.").await;

        let messages = take(&session).await;
        assert_eq!(
            messages,
            vec![
                FlashMessage::new(FlashLevel::Success, "Added Denim Blue Jeans to cart."),
                FlashMessage::new(FlashLevel::Danger, "Your cart is empty."),
            ]
        );

        assert!(take(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_take_on_fresh_session_is_empty() {
        assert!(take(&session()).await.is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&FlashLevel::Danger).expect("serialize");
        assert_eq!(json, "\"danger\"");
        assert_eq!(FlashLevel::Success.css_class(), "flash-success");
    }
}
