//! Server core: configuration, state, errors and the HTTP listener
//!
//! - [`Config`] - process options
//! - [`ConfigStore`] - settings file
//! - [`ServerState`] - shared handler state
//! - [`Server`] - HTTP server with graceful shutdown
//! - [`ServerError`] - handler errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Config, ConfigError, ConfigStore, app_folder};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
