//! Price label templates
//!
//! Fixed layouts for 248×176 dot label stock. The formatter is pure: it
//! only returns bytes and never touches I/O.

use shared::models::LabelVariant;

use crate::zpl::{Justify, LineColor, ZplBuilder};

/// Printable width of the label stock in dots
pub const LABEL_WIDTH: u32 = 248;
/// Label length in dots
pub const LABEL_HEIGHT: u32 = 176;

const MARGIN_X: u32 = 10;
const PRICE_FONT: u32 = 40;
const DISCOUNT_FONT: u32 = 20;

// Normal label
const NORMAL_PRICE_Y: u32 = 70;

// Sale label
const SALE_TOP_Y: u32 = 30;
const SALE_RULE_Y: u32 = 45;
const SALE_RULE_WIDTH: u32 = 228;
const SALE_RULE_THICKNESS: u32 = 4;
const SALE_DISCOUNT_Y: u32 = 67;
const SALE_BOTTOM_Y: u32 = 90;

/// Build the ZPL format for a label variant
///
/// The printer repeats the label `quantity` times through a single `^PQ`
/// directive.
pub fn generate_label(variant: &LabelVariant, quantity: u32) -> Vec<u8> {
    let mut b = ZplBuilder::new();
    b.utf8()
        .print_width(LABEL_WIDTH)
        .label_length(LABEL_HEIGHT)
        .label_home(0, 0);

    match variant {
        LabelVariant::Normal { text } => {
            b.text_block(MARGIN_X, NORMAL_PRICE_Y, LABEL_WIDTH, PRICE_FONT, Justify::Center, text);
        }
        LabelVariant::Sale {
            top_text,
            bottom_text,
            discount_text,
        } => {
            b.text_block(MARGIN_X, SALE_TOP_Y, LABEL_WIDTH, PRICE_FONT, Justify::Center, top_text);
            // Strike-through across the old price
            b.graphic_box(
                MARGIN_X,
                SALE_RULE_Y,
                SALE_RULE_WIDTH,
                SALE_RULE_THICKNESS,
                SALE_RULE_THICKNESS,
                LineColor::Black,
            );
            b.text_block(
                MARGIN_X,
                SALE_DISCOUNT_Y,
                LABEL_WIDTH,
                DISCOUNT_FONT,
                Justify::Center,
                discount_text,
            );
            b.text_block(
                MARGIN_X,
                SALE_BOTTOM_Y,
                LABEL_WIDTH,
                PRICE_FONT,
                Justify::Center,
                bottom_text,
            );
        }
    }

    b.quantity(quantity);
    b.build()
}

/// Calibration label used by "test print"
pub fn test_label() -> Vec<u8> {
    let mut b = ZplBuilder::new();
    b.text_at(50, 50, "DN,36,20", "Test Print");
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(variant: &LabelVariant, qty: u32) -> String {
        String::from_utf8(generate_label(variant, qty)).unwrap()
    }

    #[test]
    fn test_normal_label() {
        let zpl = render(
            &LabelVariant::Normal {
                text: "100 HUF".into(),
            },
            3,
        );

        assert_eq!(zpl.matches("^PQ3").count(), 1);
        assert_eq!(zpl.matches("^FD100 HUF^FS").count(), 1);
        assert_eq!(zpl.matches("^FD").count(), 1);
        assert!(!zpl.contains("^GB"));
        assert!(zpl.trim_end().ends_with("^XZ"));
    }

    #[test]
    fn test_sale_label_field_order() {
        let zpl = render(
            &LabelVariant::Sale {
                top_text: "200 HUF".into(),
                bottom_text: "150 HUF".into(),
                discount_text: "- 25 %".into(),
            },
            1,
        );

        let top = zpl.find("^FD200 HUF^FS").unwrap();
        let rule = zpl.find("^GB").unwrap();
        let discount = zpl.find("^FD- 25 %^FS").unwrap();
        let bottom = zpl.find("^FD150 HUF^FS").unwrap();

        assert!(top < rule && rule < discount && discount < bottom);
        assert_eq!(zpl.matches("^GB").count(), 1);
        assert_eq!(zpl.matches("^PQ1").count(), 1);
        assert!(zpl.trim_end().ends_with("^XZ"));
    }

    #[test]
    fn test_degenerate_sale_label_still_complete() {
        let zpl = render(
            &LabelVariant::Sale {
                top_text: "200 HUF".into(),
                bottom_text: String::new(),
                discount_text: String::new(),
            },
            1,
        );
        assert_eq!(zpl.matches("^FD^FS").count(), 2);
        assert!(zpl.trim_end().ends_with("^XZ"));
    }

    #[test]
    fn test_layout_matches_label_stock() {
        let zpl = render(&LabelVariant::Normal { text: "1".into() }, 1);
        assert!(zpl.contains("^PW248"));
        assert!(zpl.contains("^LL176"));
        assert!(zpl.contains("^CI28"));
    }

    #[test]
    fn test_test_label() {
        let zpl = String::from_utf8(test_label()).unwrap();
        assert!(zpl.contains("^FO50,50^ADN,36,20^FDTest Print^FS"));
        assert!(zpl.trim_end().ends_with("^XZ"));
    }
}
