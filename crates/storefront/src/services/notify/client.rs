//! Telegram Bot API client.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::NotificationError;
use super::messages::{Notification, ParseMode};
use crate::config::TelegramConfig;

/// Upper bound on a single delivery attempt.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body for `sendMessage`.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

/// Error body returned by the Bot API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
struct Destination {
    api_base: String,
    bot_token: SecretString,
    chat_id: String,
}

/// Client for posting messages to the configured Telegram chat.
///
/// Without configuration every send fails with
/// [`NotificationError::NotConfigured`].
#[derive(Clone)]
pub struct NotificationClient {
    client: Client,
    destination: Option<Destination>,
}

impl std::fmt::Debug for NotificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationClient")
            .field("bot_token", &"[REDACTED]")
            .field(
                "chat_id",
                &self.destination.as_ref().map(|d| d.chat_id.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl NotificationClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: Option<&TelegramConfig>) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| NotificationError::Client(e.to_string()))?;

        Ok(Self {
            client,
            destination: config.map(|c| Destination {
                api_base: c.api_base.trim_end_matches('/').to_string(),
                bot_token: c.bot_token.clone(),
                chat_id: c.chat_id.clone(),
            }),
        })
    }

    /// Whether a destination is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.destination.is_some()
    }

    /// Deliver a message, reporting any failure to the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` without credentials, `Http` on transport
    /// failure or timeout, and `Api` when Telegram answers with a non-2xx
    /// status.
    #[instrument(skip(self, notification), fields(chars = notification.text.len()))]
    pub async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let destination = self
            .destination
            .as_ref()
            .ok_or(NotificationError::NotConfigured)?;

        let body = SendMessage {
            chat_id: &destination.chat_id,
            text: &notification.text,
            parse_mode: notification.parse_mode,
        };

        // The token is part of the URL, so strip it from transport errors.
        let response = self
            .client
            .post(format!(
                "{}/bot{}/sendMessage",
                destination.api_base,
                destination.bot_token.expose_secret()
            ))
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .json::<ApiErrorResponse>()
                .await
                .ok()
                .and_then(|r| r.description)
                .unwrap_or_else(|| status.to_string());
            return Err(NotificationError::Api {
                status: status.as_u16(),
                description,
            });
        }

        debug!("Notification delivered");
        Ok(())
    }

    /// Deliver a message, logging and discarding any failure.
    pub async fn send_best_effort(&self, notification: &Notification) {
        if let Err(e) = self.send(notification).await {
            warn!(error = %e, "Notification delivery failed; continuing");
        }
    }
}
