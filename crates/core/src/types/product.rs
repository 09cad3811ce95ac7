//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A purchasable product.
///
/// Products are defined once at startup and never mutated; identity is the
/// [`ProductId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    /// Absolute URL of the product photo.
    pub image: String,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            description: description.into(),
            image: image.into(),
        }
    }

    /// Path of the product detail page.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/product/{}", self.id)
    }
}
