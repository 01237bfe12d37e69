//! Price entry page

use shared::models::AppConfig;

use crate::printing::{Outcome, price_text};

const TEMPLATE: &str = include_str!("../../../assets/index.html");

/// Render the form, optionally with the outcome of the last submission
pub fn render(settings: &AppConfig, outcome: Option<&Outcome>) -> String {
    let display = settings.display_settings();

    let price_buttons = settings
        .price_suggestion_type
        .suggestions()
        .into_iter()
        .map(|price| {
            format!(
                r#"<button type="button" class="price" data-price="{}">{}</button>"#,
                price.normalize(),
                escape(&price_text(price, &display))
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ");

    let status = match outcome {
        Some(outcome) => format!(
            r#"<div class="status {}">{}</div>"#,
            if outcome.is_printed() { "ok" } else { "error" },
            escape(&outcome.message())
        ),
        None => String::new(),
    };

    TEMPLATE
        .replace("{{status}}", &status)
        .replace("{{price_buttons}}", &price_buttons)
        .replace("{{suggestion_type}}", settings.price_suggestion_type.as_str())
        .replace("{{currency}}", &escape(&display.currency_symbol))
        .replace("{{show_decimals}}", if display.show_decimals { "on" } else { "off" })
        .replace("{{decimal_places}}", &display.decimal_places.to_string())
        .replace("{{version}}", env!("CARGO_PKG_VERSION"))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
