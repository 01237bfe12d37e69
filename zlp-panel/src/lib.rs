//! Control panel for the label server
//!
//! Console edition of the desktop panel: starts and stops the server
//! process, edits settings, discovers printers and sends test prints.
//! Long-running work runs on background tasks that report back to the
//! panel loop over a channel, so the prompt stays responsive.

pub mod client;
pub mod commands;
pub mod error;
pub mod instance;
pub mod panel;
pub mod process;
pub mod qr;
pub mod update;

pub use client::ServerClient;
pub use commands::Command;
pub use error::{PanelError, PanelResult};
pub use instance::SingleInstance;
pub use panel::{Flow, Panel, PanelEvent, PanelOptions};
pub use update::{UpdateStatus, check_for_update};
