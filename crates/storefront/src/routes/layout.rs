//! Data every full page needs: pending flashes and the cart badge.

use tower_sessions::Session;

use crate::catalog::Catalog;
use crate::models::{FlashMessage, flash};
use crate::services::{Cart, CartSummary};

/// Shared page chrome passed to every full-page template as `page`.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Flash messages consumed by this render.
    pub flashes: Vec<FlashMessage>,
    /// Units in the visitor's cart that resolve to catalog products.
    pub cart_count: u32,
}

impl PageContext {
    /// Build the context, draining pending flashes.
    pub async fn load(session: &Session, catalog: &Catalog) -> Self {
        let cart = Cart::load(session).await;
        Self::with_summary(session, &cart.summary(catalog)).await
    }

    /// Build the context for an already-priced cart, so the badge and the
    /// cart page count the same lines.
    pub async fn with_summary(session: &Session, summary: &CartSummary<'_>) -> Self {
        Self {
            flashes: flash::take(session).await,
            cart_count: summary.item_count,
        }
    }
}
