//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-scoped cart: typed lines, pricing, session codec
//! - `notify` - Telegram relay for orders and contact messages

pub mod cart;
pub mod notify;

pub use cart::{Cart, CartError, CartLine, CartSummary};
pub use notify::{NotificationClient, NotificationError};
