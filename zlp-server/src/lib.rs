//! Zebra label printing server
//!
//! Serves the price entry form on the local network, turns submissions into
//! ZPL price labels and sends them to the configured printer.
//!
//! # Module layout
//!
//! ```text
//! zlp-server/src/
//! ├── core/       # config + settings file, state, errors, HTTP server
//! ├── printing/   # price text, print request handler, print log
//! ├── api/        # HTTP routes
//! └── utils/      # logging
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod utils;

pub use crate::core::{Config, ConfigError, ConfigStore, Server, ServerError, ServerState, app_folder};
pub use printing::{Outcome, PrintHandler, PrintLog, format_price};
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
 _____ _     ____
|__  /| |   |  _ \
  / / | |   | |_) |
 / /_ | |___|  __/
/____||_____|_|     label server v{}
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
