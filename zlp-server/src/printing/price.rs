//! Price text for labels

use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::DisplaySettings;

/// Render a price per the display settings
///
/// With decimals on, exactly `decimal_places` fractional digits are shown
/// (zero-padded). With decimals off the value is rounded to an integer.
/// Midpoints round to even in both cases. Sign is not checked.
pub fn format_price(value: Decimal, settings: &DisplaySettings) -> String {
    if settings.show_decimals {
        let places = settings.decimal_places;
        let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(places);
        rounded.to_string()
    } else {
        let mut rounded = value.round();
        rounded.rescale(0);
        rounded.to_string()
    }
}

/// Price followed by the currency, e.g. `"1000 HUF"`
pub fn price_text(value: Decimal, settings: &DisplaySettings) -> String {
    format!("{} {}", format_price(value, settings), settings.currency_symbol)
}

/// Discount annotation, e.g. `"- 20 %"` for a fraction of `0.2`
pub fn discount_text(fraction: Decimal) -> String {
    let mut percent = (fraction * Decimal::ONE_HUNDRED).round();
    percent.rescale(0);
    format!("- {} %", percent)
}
