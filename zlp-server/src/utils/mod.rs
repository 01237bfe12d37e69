//! Utilities
//!
//! - [`logger`]: tracing subscriber setup and log retention

pub mod logger;
