//! Health check route
//!
//! ```json
//! { "status": "ok", "version": "1.1.2", "uptime_seconds": 42 }
//! ```
//!
//! The control panel polls this to tell whether the server is running.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use zlp_printer::Transport;

use crate::core::ServerState;

pub fn router<T: Transport + 'static>() -> Router<ServerState<T>> {
    Router::new().route("/health", get(health::<T>))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health<T: Transport + 'static>(State(state): State<ServerState<T>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}
