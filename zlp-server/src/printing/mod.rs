//! Price label printing
//!
//! - [`price`]: price and discount text
//! - [`handler`]: form input to printed label
//! - [`log`]: `log.txt` print event log

pub mod handler;
pub mod log;
pub mod price;

pub use handler::{EMPTY_SUBMISSION, Outcome, PrintHandler, build_variant};
pub use log::PrintLog;
pub use price::{discount_text, format_price, price_text};
