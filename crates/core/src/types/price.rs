//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price from a whole number of cents.
    #[must_use]
    pub fn usd_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2), CurrencyCode::USD)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Price multiplied by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Sum of two prices. The currency of `self` wins.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self::new(self.amount + other.amount, self.currency_code)
    }
}

impl fmt::Display for Price {
    /// Formats for display, e.g. `$19.99`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::usd_cents(3499).to_string(), "$34.99");
        assert_eq!(Price::usd_cents(1200).to_string(), "$12.00");
        assert_eq!(Price::zero(CurrencyCode::USD).to_string(), "$0.00");
    }

    #[test]
    fn test_times_and_plus() {
        let jeans = Price::usd_cents(4999);
        assert_eq!(jeans.times(2), Price::usd_cents(9998));
        assert_eq!(
            Price::usd_cents(3499).plus(&jeans.times(2)),
            Price::usd_cents(13497)
        );
    }

    #[test]
    fn test_decimal_avoids_float_drift() {
        let total = (0..10).fold(Price::zero(CurrencyCode::USD), |acc, _| {
            acc.plus(&Price::usd_cents(10))
        });
        assert_eq!(total, Price::usd_cents(100));
        assert_eq!(total.to_string(), "$1.00");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::USD.symbol(), "$");
        assert_eq!(CurrencyCode::EUR.symbol(), "€");
        assert_eq!(CurrencyCode::GBP.symbol(), "£");
    }
}
