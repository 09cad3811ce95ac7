//! Session-related types.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the cart map (`{"<product id>": quantity}`).
    pub const CART: &str = "cart";

    /// Key for the pending flash-message queue.
    pub const FLASHES: &str = "_flashes";
}
