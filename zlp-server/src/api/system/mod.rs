//! Server lifecycle route

use axum::{Json, Router, extract::State, routing::get};
use shared::ApiResponse;
use zlp_printer::Transport;

use crate::core::ServerState;

pub fn router<T: Transport + 'static>() -> Router<ServerState<T>> {
    Router::new().route("/stop", get(stop::<T>))
}

/// GET /stop - answer, then shut down gracefully
///
/// The response is still delivered: graceful shutdown waits for in-flight
/// requests.
pub async fn stop<T: Transport + 'static>(State(state): State<ServerState<T>>) -> Json<ApiResponse<()>> {
    tracing::info!("Stop requested over HTTP");
    state.request_shutdown();
    Json(ApiResponse::message(true, "Server is shutting down..."))
}
