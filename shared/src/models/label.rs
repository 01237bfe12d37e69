//! Label Variant Model

use serde::{Deserialize, Serialize};

/// One of the two label layouts
///
/// A label is `Sale` only when the request carried an old price; the plain
/// price label is `Normal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelVariant {
    /// Single centered price
    Normal { text: String },
    /// Struck-through old price, discount annotation and new price
    Sale {
        top_text: String,
        bottom_text: String,
        discount_text: String,
    },
}
