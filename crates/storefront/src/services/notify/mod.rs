//! Telegram notifications for orders and contact-form submissions.
//!
//! This module provides:
//! - [`NotificationClient`] for posting messages through the Bot API
//! - Message builders for order summaries and contact messages
//!
//! Delivery is a single attempt bounded by a short timeout. Callers choose
//! how failures surface: [`NotificationClient::send`] returns the error,
//! [`NotificationClient::send_best_effort`] logs it and moves on.

mod client;
mod error;
mod messages;

pub use client::{NotificationClient, SEND_TIMEOUT};
pub use error::NotificationError;
pub use messages::{ContactDetails, Notification, ParseMode, contact_message, order_summary};
