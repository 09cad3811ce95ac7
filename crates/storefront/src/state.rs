//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::{NotificationClient, NotificationError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("notification client: {0}")]
    Notification(#[from] NotificationError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything inside is
/// immutable after startup; per-visitor state lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    notifier: NotificationClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog, built once at startup
    ///
    /// # Errors
    ///
    /// Returns an error if the notification HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StateError> {
        let notifier = NotificationClient::new(config.telegram.as_ref())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                notifier,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the notification client.
    #[must_use]
    pub fn notifier(&self) -> &NotificationClient {
        &self.inner.notifier
    }
}
