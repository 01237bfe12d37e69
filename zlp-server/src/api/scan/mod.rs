//! Printer discovery route

mod handler;

use axum::{Router, routing::post};
use zlp_printer::Transport;

use crate::core::ServerState;

pub use handler::ScanRequest;

pub fn router<T: Transport + 'static>() -> Router<ServerState<T>> {
    Router::new().route("/api/scan", post(handler::scan::<T>))
}
