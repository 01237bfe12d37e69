//! # zlp-printer
//!
//! ZPL label printing library: what goes on a price label and how it
//! reaches a Zebra-compatible printer.
//!
//! ## Scope
//!
//! - ZPL format building ([`ZplBuilder`])
//! - Price label templates ([`generate_label`], [`test_label`])
//! - Raw TCP printing on port 9100 and Windows RAW queue printing
//! - Printer discovery on the local IPv4 networks ([`discovery`])
//!
//! Price arithmetic and text formatting stay in the server; this crate
//! receives finished [`shared::LabelVariant`]s.
//!
//! ## Example
//!
//! ```ignore
//! use shared::models::{LabelVariant, PrinterEndpoint};
//! use zlp_printer::{RawTransport, Transport, generate_label};
//!
//! let zpl = generate_label(&LabelVariant::Normal { text: "100 HUF".into() }, 2);
//! let endpoint = PrinterEndpoint::network("192.168.1.100", 9100);
//! RawTransport::new().send(&endpoint, &zpl).await?;
//! ```

pub mod discovery;
mod error;
mod label;
mod printer;
mod transport;
mod zpl;

// Re-exports
pub use discovery::{ClassificationPolicy, ScanEvent, ScanHandle, ScanOptions, ScanResult, Scanner, Subnet};
pub use error::{PrintError, PrintResult};
pub use label::{LABEL_HEIGHT, LABEL_WIDTH, generate_label, test_label};
pub use printer::{DEFAULT_CONNECT_TIMEOUT, NetworkPrinter, Printer, UsbPrinter};
pub use transport::{RawTransport, Transport};
pub use zpl::{Justify, LineColor, ZplBuilder};
