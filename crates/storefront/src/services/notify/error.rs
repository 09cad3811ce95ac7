//! Notification delivery errors.

use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Bot token or chat ID is not configured.
    #[error("Telegram notifications are not configured")]
    NotConfigured,

    /// Transport failure or timeout.
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Telegram answered with a non-2xx status.
    #[error("Telegram API error: {status} - {description}")]
    Api { status: u16, description: String },

    /// Failed to build the HTTP client.
    #[error("Telegram client error: {0}")]
    Client(String),
}
