//! Message builders for order and contact notifications.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::services::cart::CartSummary;

/// Telegram text formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

/// A text message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

impl Notification {
    /// Plain-text message.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
        }
    }

    /// Message rendered with Telegram's HTML subset.
    #[must_use]
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::Html),
        }
    }
}

/// Contact form fields. Missing fields arrive as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

/// Build the order summary sent at checkout.
///
/// ```text
/// New order received:
/// - Black Crew Neck Sweater x1: $34.99
/// - Denim Blue Jeans x2: $99.98
/// Total: $134.97
/// ```
#[must_use]
pub fn order_summary(summary: &CartSummary<'_>) -> Notification {
    let mut text = String::from("New order received:");
    for line in &summary.lines {
        let _ = write!(
            text,
            "\n- {} x{}: {}",
            line.product.name, line.quantity, line.subtotal
        );
    }
    let _ = write!(text, "\nTotal: {}", summary.total);

    Notification::plain(text)
}

/// Build the contact-form relay message.
#[must_use]
pub fn contact_message(details: &ContactDetails) -> Notification {
    let fields = [
        ("👤", "Name", &details.full_name),
        ("📧", "Email", &details.email),
        ("📞", "Phone", &details.phone),
        ("📝", "Subject", &details.subject),
        ("💬", "Message", &details.message),
    ];

    let mut text = String::from("📩 <b>New Contact Message</b>");
    for (icon, label, value) in fields {
        let _ = write!(text, "\n{icon} <b>{label}:</b> {}", escape_html(value.trim()));
    }

    Notification::html(text)
}

/// Escape the characters Telegram's HTML parser treats as markup.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::catalog::Catalog;
    use crate::services::cart::Cart;

    #[test]
    fn test_order_summary_lists_lines_and_total() {
        let catalog = Catalog::default();
        let stored: BTreeMap<String, serde_json::Value> =
            serde_json::from_value(json!({"2": 1, "3": 2})).expect("valid map");
        let cart = Cart::from_stored(stored);

        let message = order_summary(&cart.summary(&catalog));

        assert_eq!(
            message.text,
            "New order received:\n\
             - Black Crew Neck Sweater x1: $34.99\n\
             - Denim Blue Jeans x2: $99.98\n\
             Total: $134.97"
        );
        assert_eq!(message.parse_mode, None);
    }

    #[test]
    fn test_contact_message_uses_html_and_escapes_input() {
        let details = ContactDetails {
            full_name: "Dara <script>".to_string(),
            email: "dara@example.com".to_string(),
            phone: String::new(),
            subject: "Sizes & fit".to_string(),
            message: "  Do the jeans run small?  ".to_string(),
        };

        let message = contact_message(&details);

        assert_eq!(message.parse_mode, Some(ParseMode::Html));
        assert!(message.text.starts_with("📩 <b>New Contact Message</b>"));
        assert!(message.text.contains("<b>Name:</b> Dara &lt;script&gt;"));
        assert!(message.text.contains("<b>Subject:</b> Sizes &amp; fit"));
        assert!(message.text.contains("<b>Message:</b> Do the jeans run small?"));
        assert!(message.text.contains("<b>Phone:</b> \n"));
    }

    #[test]
    fn test_parse_mode_serializes_as_telegram_expects() {
        let json = serde_json::to_string(&ParseMode::Html).expect("serialize");
        assert_eq!(json, "\"HTML\"");
    }
}
