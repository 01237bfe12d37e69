//! Print request handling
//!
//! Turns one [`PriceInput`] into a label variant, renders it and hands it
//! to the transport. The decision table:
//!
//! | old price | new price | discount | result |
//! |-----------|-----------|----------|--------|
//! | -         | -         | any      | rejected ("empty submission") |
//! | yes       | any       | yes      | sale: old, old × (1 − discount), `- N %` |
//! | yes       | any       | -        | sale: old, blank, blank |
//! | -         | yes       | any      | normal: new |
//!
//! A zero old price counts as absent.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{DisplaySettings, LabelVariant, PriceInput, PrinterEndpoint};
use tracing::instrument;
use zlp_printer::{Transport, generate_label};

use super::log::PrintLog;
use super::price::{discount_text, price_text};

/// Reason given when neither price was submitted
pub const EMPTY_SUBMISSION: &str = "empty submission";

/// Result of one print request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Label handed to the printer
    Printed { variant: LabelVariant },
    /// Nothing to print; transport not called
    Rejected { reason: String },
    /// Label rendered but the transport failed
    Failed { variant: LabelVariant, error: String },
}

impl Outcome {
    pub fn is_printed(&self) -> bool {
        matches!(self, Outcome::Printed { .. })
    }

    /// One-line text for the user
    pub fn message(&self) -> String {
        match self {
            Outcome::Printed { variant } => describe(variant),
            Outcome::Rejected { reason } => format!("Nothing printed: {}", reason),
            Outcome::Failed { error, .. } => format!("Print failed: {}", error),
        }
    }
}

/// Choose the label for an input
///
/// Returns `None` for an empty submission.
pub fn build_variant(input: &PriceInput, settings: &DisplaySettings) -> Option<LabelVariant> {
    let old = input.old_price.filter(|p| !p.is_zero());

    match (old, input.new_price, input.discount) {
        (None, None, _) => None,
        (Some(old), _, Some(discount)) => Some(LabelVariant::Sale {
            top_text: price_text(old, settings),
            bottom_text: price_text(old * (Decimal::ONE - discount), settings),
            discount_text: discount_text(discount),
        }),
        (Some(old), _, None) => Some(LabelVariant::Sale {
            top_text: price_text(old, settings),
            bottom_text: String::new(),
            discount_text: String::new(),
        }),
        (None, Some(new), _) => Some(LabelVariant::Normal {
            text: price_text(new, settings),
        }),
    }
}

fn describe(variant: &LabelVariant) -> String {
    match variant {
        LabelVariant::Normal { text } => format!("Printed normal: {}", text),
        LabelVariant::Sale {
            top_text,
            bottom_text,
            discount_text,
        } => format!("Printed sale: {} -> {} | {}", top_text, bottom_text, discount_text),
    }
}

/// Stateless per-request print pipeline
///
/// Holds the settings it was built with; nothing changes between requests.
#[derive(Debug)]
pub struct PrintHandler<T> {
    transport: T,
    endpoint: PrinterEndpoint,
    settings: DisplaySettings,
    log: PrintLog,
}

impl<T: Transport> PrintHandler<T> {
    pub fn new(transport: T, endpoint: PrinterEndpoint, settings: DisplaySettings, log: PrintLog) -> Self {
        Self {
            transport,
            endpoint,
            settings,
            log,
        }
    }

    pub fn endpoint(&self) -> &PrinterEndpoint {
        &self.endpoint
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip(self), fields(printer = %self.endpoint))]
    pub async fn handle(&self, input: &PriceInput) -> Outcome {
        let Some(variant) = build_variant(input, &self.settings) else {
            // User input problem, not a print failure
            self.log.info("Empty submission").await;
            return Outcome::Rejected {
                reason: EMPTY_SUBMISSION.to_string(),
            };
        };

        let zpl = generate_label(&variant, input.quantity);

        match self.transport.send(&self.endpoint, &zpl).await {
            Ok(()) => {
                self.log.info(&describe(&variant)).await;
                Outcome::Printed { variant }
            }
            Err(e) => {
                self.log
                    .error(&format!("Failed to send label to {}: {}", self.endpoint, e))
                    .await;
                Outcome::Failed {
                    variant,
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn settings() -> DisplaySettings {
        DisplaySettings::default()
    }

    #[test]
    fn test_empty_is_none() {
        let input = PriceInput::from_form("", "", "0.2", "1");
        assert_eq!(build_variant(&input, &settings()), None);
    }

    #[test]
    fn test_zero_old_price_counts_as_absent() {
        let input = PriceInput::from_form("0", "", "", "1");
        assert_eq!(build_variant(&input, &settings()), None);

        let input = PriceInput::from_form("0", "450", "0.1", "1");
        assert_eq!(
            build_variant(&input, &settings()),
            Some(LabelVariant::Normal {
                text: "450 HUF".into()
            })
        );
    }

    #[test]
    fn test_sale_with_discount() {
        let input = PriceInput::new(Some(d("1000")), None, Some(d("0.2")), 2);
        assert_eq!(
            build_variant(&input, &settings()),
            Some(LabelVariant::Sale {
                top_text: "1000 HUF".into(),
                bottom_text: "800 HUF".into(),
                discount_text: "- 20 %".into(),
            })
        );
    }

    #[test]
    fn test_sale_ignores_new_price_when_discount_given() {
        let input = PriceInput::new(Some(d("200")), Some(d("199")), Some(d("0.25")), 1);
        let Some(LabelVariant::Sale { bottom_text, .. }) = build_variant(&input, &settings()) else {
            panic!("expected sale label");
        };
        assert_eq!(bottom_text, "150 HUF");
    }

    #[test]
    fn test_old_price_without_discount_is_degenerate_sale() {
        let input = PriceInput::new(Some(d("200")), Some(d("150")), None, 1);
        assert_eq!(
            build_variant(&input, &settings()),
            Some(LabelVariant::Sale {
                top_text: "200 HUF".into(),
                bottom_text: String::new(),
                discount_text: String::new(),
            })
        );
    }

    #[test]
    fn test_new_price_only_is_normal() {
        let input = PriceInput::new(None, Some(d("500")), None, 1);
        assert_eq!(
            build_variant(&input, &settings()),
            Some(LabelVariant::Normal {
                text: "500 HUF".into()
            })
        );
    }

    #[test]
    fn test_sale_price_uses_display_settings() {
        let settings = DisplaySettings::new("zł", true, 2);
        let input = PriceInput::new(Some(d("9.99")), None, Some(d("0.3")), 1);
        assert_eq!(
            build_variant(&input, &settings),
            Some(LabelVariant::Sale {
                top_text: "9.99 zł".into(),
                bottom_text: "6.99 zł".into(),
                discount_text: "- 30 %".into(),
            })
        );
    }

    #[test]
    fn test_outcome_messages() {
        let printed = Outcome::Printed {
            variant: LabelVariant::Sale {
                top_text: "1000 HUF".into(),
                bottom_text: "800 HUF".into(),
                discount_text: "- 20 %".into(),
            },
        };
        assert_eq!(printed.message(), "Printed sale: 1000 HUF -> 800 HUF | - 20 %");
        assert!(printed.is_printed());

        let rejected = Outcome::Rejected {
            reason: EMPTY_SUBMISSION.into(),
        };
        assert_eq!(rejected.message(), "Nothing printed: empty submission");
    }
}
