//! Shared types for the Zebra label printer
//!
//! Plain data model used by the printer library, the web server and the
//! control panel: printer endpoints, price input, display settings, label
//! variants and the persisted settings document. No I/O lives here.

pub mod models;
pub mod response;

// Re-exports
pub use models::*;
pub use response::ApiResponse;
