//! Session-scoped shopping cart.
//!
//! Business logic works on a typed [`Cart`] keyed by [`ProductId`]. The
//! session holds the cart as a JSON object with string keys
//! (`{"2": 1, "3": 2}`); encoding and validation happen only in
//! [`Cart::load`] / [`Cart::save`].

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tower_sessions::Session;

use threadline_core::{CurrencyCode, Price, Product, ProductId};

use crate::catalog::Catalog;
use crate::models::session_keys;

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The referenced product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

/// A visitor's cart: product → quantity (always ≥ 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

/// One priced cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
    pub subtotal: Price,
}

/// Priced view of a cart, computed fresh from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary<'a> {
    pub lines: Vec<CartLine<'a>>,
    pub total: Price,
    pub item_count: u32,
}

impl CartSummary<'_> {
    /// Whether no line resolved to a product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Cart {
    /// Add `quantity` of a product, clamping the quantity to at least 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if `id` is not in the catalog.
    pub fn add<'c>(
        &mut self,
        catalog: &'c Catalog,
        id: ProductId,
        quantity: i64,
    ) -> Result<&'c Product, CartError> {
        let product = catalog.get(id).ok_or(CartError::ProductNotFound(id))?;
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);

        self.lines
            .entry(id)
            .and_modify(|q| *q = q.saturating_add(quantity))
            .or_insert(quantity);

        Ok(product)
    }

    /// Remove a product outright. Returns `false` if it was not in the cart.
    pub fn remove(&mut self, id: ProductId) -> bool {
        self.lines.remove(&id).is_some()
    }

    /// Quantity held for a product.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> Option<u32> {
        self.lines.get(&id).copied()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Price the cart against the catalog.
    ///
    /// Lines whose product no longer resolves are skipped.
    #[must_use]
    pub fn summary<'c>(&self, catalog: &'c Catalog) -> CartSummary<'c> {
        let lines: Vec<CartLine<'c>> = self
            .lines
            .iter()
            .filter_map(|(id, &quantity)| {
                let product = catalog.get(*id)?;
                Some(CartLine {
                    product,
                    quantity,
                    subtotal: product.price.times(quantity),
                })
            })
            .collect();

        let total = lines
            .iter()
            .fold(Price::zero(CurrencyCode::USD), |acc, line| {
                acc.plus(&line.subtotal)
            });
        let item_count = lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity));

        CartSummary {
            lines,
            total,
            item_count,
        }
    }

    // =========================================================================
    // Session codec
    // =========================================================================

    /// Decode the session representation, dropping malformed entries.
    ///
    /// Keys must parse as integers and quantities must be positive integers;
    /// anything else is stale or tampered client state and is skipped.
    #[must_use]
    pub fn from_stored(stored: BTreeMap<String, Value>) -> Self {
        let lines = stored
            .into_iter()
            .filter_map(|(key, value)| {
                let Ok(id) = key.parse::<ProductId>() else {
                    tracing::debug!(key = %key, "Skipping malformed cart key");
                    return None;
                };
                let quantity = value
                    .as_u64()
                    .filter(|q| *q >= 1)
                    .map(|q| u32::try_from(q).unwrap_or(u32::MAX));
                if quantity.is_none() {
                    tracing::debug!(key = %key, value = %value, "Skipping malformed cart quantity");
                }
                quantity.map(|q| (id, q))
            })
            .collect();

        Self { lines }
    }

    /// Encode for the session.
    #[must_use]
    pub fn to_stored(&self) -> BTreeMap<String, u32> {
        self.lines
            .iter()
            .map(|(id, q)| (id.to_string(), *q))
            .collect()
    }

    /// Load the cart from the session. Missing or unreadable state yields an
    /// empty cart.
    pub async fn load(session: &Session) -> Self {
        match session
            .get::<BTreeMap<String, Value>>(session_keys::CART)
            .await
        {
            Ok(stored) => stored.map(Self::from_stored).unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to read cart from session: {e}");
                Self::default()
            }
        }
    }

    /// Persist the cart into the session.
    ///
    /// # Errors
    ///
    /// Returns the session store error if the write fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        if self.is_empty() {
            session
                .remove::<BTreeMap<String, Value>>(session_keys::CART)
                .await?;
            return Ok(());
        }
        session.insert(session_keys::CART, self.to_stored()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::middleware::CookieStore;

    fn stored(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_add_clamps_non_positive_quantity() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();

        cart.add(&catalog, ProductId::new(1), 0).unwrap();
        assert_eq!(cart.quantity(ProductId::new(1)), Some(1));

        cart.add(&catalog, ProductId::new(2), -5).unwrap();
        assert_eq!(cart.quantity(ProductId::new(2)), Some(1));
    }

    #[test]
    fn test_add_twice_accumulates() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();

        cart.add(&catalog, ProductId::new(3), 2).unwrap();
        let product = cart.add(&catalog, ProductId::new(3), 3).unwrap();

        assert_eq!(product.name, "Denim Blue Jeans");
        assert_eq!(cart.quantity(ProductId::new(3)), Some(5));
        assert_eq!(cart.summary(&catalog).lines.len(), 1);
    }

    #[test]
    fn test_add_unknown_product_fails_without_mutation() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();

        let err = cart.add(&catalog, ProductId::new(42), 1).unwrap_err();
        assert_eq!(err, CartError::ProductNotFound(ProductId::new(42)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates_instead_of_overflowing() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();

        cart.add(&catalog, ProductId::new(1), i64::MAX).unwrap();
        cart.add(&catalog, ProductId::new(1), 10).unwrap();
        assert_eq!(cart.quantity(ProductId::new(1)), Some(u32::MAX));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();
        cart.add(&catalog, ProductId::new(1), 1).unwrap();
        let before = cart.clone();

        assert!(!cart.remove(ProductId::new(5)));
        assert_eq!(cart, before);

        assert!(cart.remove(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_summary_example_totals() {
        let catalog = Catalog::default();
        let cart = Cart::from_stored(stored(json!({"2": 1, "3": 2})));

        let summary = cart.summary(&catalog);
        let subtotals: Vec<String> = summary
            .lines
            .iter()
            .map(|l| l.subtotal.to_string())
            .collect();

        assert_eq!(subtotals, vec!["$34.99", "$99.98"]);
        assert_eq!(summary.total.to_string(), "$134.97");
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_summary_skips_unresolvable_products() {
        let catalog = Catalog::default();
        let cart = Cart::from_stored(stored(json!({"99": 2, "abc": 1})));

        let summary = cart.summary(&catalog);
        assert!(summary.is_empty());
        assert_eq!(summary.total.to_string(), "$0.00");
        assert_eq!(summary.item_count, 0);
    }

    #[test]
    fn test_from_stored_drops_malformed_entries() {
        let cart = Cart::from_stored(stored(json!({
            "1": 2,
            "abc": 1,
            "2": 0,
            "3": -1,
            "4": "two",
            "5": 1.5,
            " 6 ": 1
        })));

        assert_eq!(cart.quantity(ProductId::new(1)), Some(2));
        assert_eq!(cart.quantity(ProductId::new(6)), Some(1));
        assert_eq!(cart.summary(&Catalog::default()).item_count, 3);
        assert_eq!(cart.to_stored().len(), 2);
    }

    #[test]
    fn test_clear_empties_cart() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();
        cart.add(&catalog, ProductId::new(4), 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.summary(&catalog).item_count, 0);
    }

    #[tokio::test]
    async fn test_save_and_load_through_session() {
        let session = Session::new(None, Arc::new(CookieStore::default()), None);
        let catalog = Catalog::default();

        let mut cart = Cart::load(&session).await;
        assert!(cart.is_empty());

        cart.add(&catalog, ProductId::new(2), 1).unwrap();
        cart.add(&catalog, ProductId::new(3), 2).unwrap();
        cart.save(&session).await.unwrap();

        let stored = session
            .get::<BTreeMap<String, u32>>(session_keys::CART)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("2"), Some(&1));
        assert_eq!(stored.get("3"), Some(&2));

        let reloaded = Cart::load(&session).await;
        assert_eq!(reloaded, cart);

        cart.clear();
        cart.save(&session).await.unwrap();
        assert!(
            session
                .get::<BTreeMap<String, u32>>(session_keys::CART)
                .await
                .unwrap()
                .is_none()
        );
    }
}
