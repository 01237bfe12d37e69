//! Price input and display settings

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest number of fractional digits a label may show
pub const MAX_DECIMAL_PLACES: u32 = 4;

/// One print request as submitted by the price entry form
///
/// Never persisted. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInput {
    pub old_price: Option<Decimal>,
    pub new_price: Option<Decimal>,
    /// Fraction taken off the old price, in `[0, 1)` (`0.2` = 20 % off)
    pub discount: Option<Decimal>,
    pub quantity: u32,
}

impl PriceInput {
    pub fn new(
        old_price: Option<Decimal>,
        new_price: Option<Decimal>,
        discount: Option<Decimal>,
        quantity: u32,
    ) -> Self {
        Self {
            old_price,
            new_price,
            discount: discount.filter(is_valid_discount),
            quantity: quantity.max(1),
        }
    }

    /// Build from raw form fields
    ///
    /// Blank or unparsable prices become `None`. A discount outside `(0, 1)`
    /// is dropped, and a missing or non-positive quantity becomes 1.
    pub fn from_form(old_price: &str, new_price: &str, discount: &str, quantity: &str) -> Self {
        let quantity = quantity.trim().parse::<u32>().unwrap_or(1);
        Self::new(
            parse_decimal(old_price),
            parse_decimal(new_price),
            parse_decimal(discount),
            quantity,
        )
    }
}

fn is_valid_discount(d: &Decimal) -> bool {
    d.is_sign_positive() && !d.is_zero() && *d < Decimal::ONE
}

/// Parse a user-typed number, accepting a decimal comma
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let normalized = raw.replace(',', ".");
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// How prices are rendered on labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub currency_symbol: String,
    pub show_decimals: bool,
    /// Always within `0..=MAX_DECIMAL_PLACES`
    pub decimal_places: u32,
}

impl DisplaySettings {
    pub fn new(currency_symbol: impl Into<String>, show_decimals: bool, decimal_places: i64) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            show_decimals,
            decimal_places: decimal_places.clamp(0, MAX_DECIMAL_PLACES as i64) as u32,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::new("HUF", false, 2)
    }
}
