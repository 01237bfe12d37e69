//! Data models
//!
//! Shared between zlp-printer, zlp-server and zlp-panel.

pub mod endpoint;
pub mod label;
pub mod price;
pub mod settings;

// Re-exports
pub use endpoint::*;
pub use label::*;
pub use price::*;
pub use settings::*;
