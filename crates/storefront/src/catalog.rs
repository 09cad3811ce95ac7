//! Static product catalog.
//!
//! The catalog is built once at startup and shared read-only through
//! [`AppState`](crate::state::AppState). Lookups are a linear scan; the list
//! is small and never changes.

use threadline_core::{Price, Product, ProductId};

/// Read-only list of purchasable products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from a fixed product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products, in listing order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    /// The launch apparel line.
    fn default() -> Self {
        Self::new(vec![
            Product::new(
                ProductId::new(1),
                "Classic White T-Shirt",
                Price::usd_cents(1299),
                "Soft cotton tee, comfortable and durable. Perfect for everyday wear.",
                "https://www.trueclassictees.com/cdn/shop/files/TCT_4000_Short-Sleeve-Classic-Crew_WHITE_Large_Ecomm_2025_JUN_2.jpg?v=1762269520&width=750",
            ),
            Product::new(
                ProductId::new(2),
                "Black Crew Neck Sweater",
                Price::usd_cents(3499),
                "Cozy knit sweater made from premium wool blend. Ideal for layering.",
                "https://www.trueclassictees.com/cdn/shop/files/4202_BLACK_2_498e9ba1-a813-43e9-a736-c6095cfd0288.jpg?v=1762284577&width=750",
            ),
            Product::new(
                ProductId::new(3),
                "Denim Blue Jeans",
                Price::usd_cents(4999),
                "Classic slim-fit jeans in durable denim. Timeless style for any occasion.",
                "https://www.trueclassictees.com/cdn/shop/files/Authentic_Slim_Denim_Jeans_Light_Indigo_2_e203f3c5-ca5f-46ad-8263-251b65cc4620.jpg?v=1762281945&width=750",
            ),
            Product::new(
                ProductId::new(4),
                "Casual Gray Hoodie",
                Price::usd_cents(3995),
                "Warm and comfortable hoodie. Great for outdoor activities and relaxation.",
                "https://www.trueclassictees.com/cdn/shop/files/TCT_4213_Waffle-Hoodie_CARBON_Large_Ecomm_2025_MAR_2.jpg?v=1762278615&width=750",
            ),
            Product::new(
                ProductId::new(5),
                "Summer Floral Dress",
                Price::usd_cents(4499),
                "Light and breathable dress perfect for warm seasons. Comfortable fit.",
                "https://www.trueclassictees.com/cdn/shop/files/TCG_6501_Girls-LS-Fleece-Dress_Medium_Deep-Emerald_2025_OCT_JJ_3_hxttta_yr50k8.jpg?v=1760660796&width=750",
            ),
            Product::new(
                ProductId::new(6),
                "White Button-Up Shirt",
                Price::usd_cents(3299),
                "Crisp white shirt for work or casual wear. Quality cotton fabric.",
                "https://www.trueclassictees.com/cdn/shop/files/4236_WHITE_2.jpg?v=1762279594&width=1420",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_unique_ids() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 6);

        let mut ids: Vec<_> = catalog.all().iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_get_existing_product() {
        let catalog = Catalog::default();
        let product = catalog.get(ProductId::new(2)).expect("product 2 exists");
        assert_eq!(product.name, "Black Crew Neck Sweater");
        assert_eq!(product.price, Price::usd_cents(3499));
    }

    #[test]
    fn test_get_missing_product() {
        let catalog = Catalog::default();
        assert!(catalog.get(ProductId::new(0)).is_none());
        assert!(catalog.get(ProductId::new(99)).is_none());
        assert!(catalog.get(ProductId::new(-1)).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.get(ProductId::new(1)).is_none());
    }
}
