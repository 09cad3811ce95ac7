//! Domain models for storefront.
//!
//! Types stored in the visitor session: the flash-message queue and the
//! session key names.

pub mod flash;
pub mod session;

pub use flash::{FlashLevel, FlashMessage};
pub use session::keys as session_keys;
