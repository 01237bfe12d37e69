//! Settings route
//!
//! Read-only: settings are edited through the control panel, which writes
//! `gui_config.json` and restarts the server.

use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::ApiResponse;
use shared::models::{DisplaySettings, PriceSuggestionType, PrinterEndpoint};
use zlp_printer::Transport;

use crate::core::ServerState;

pub fn router<T: Transport + 'static>() -> Router<ServerState<T>> {
    Router::new().route("/api/settings", get(get_settings::<T>))
}

/// Settings as the server is using them
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub printer: PrinterEndpoint,
    pub display: DisplaySettings,
    pub price_suggestion_type: PriceSuggestionType,
    pub suggestions: Vec<Decimal>,
    pub server_port: u16,
}

/// GET /api/settings
pub async fn get_settings<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
) -> Json<ApiResponse<SettingsView>> {
    let settings = &state.settings;
    Json(ApiResponse::ok(SettingsView {
        printer: state.printer.endpoint().clone(),
        display: state.printer.settings().clone(),
        price_suggestion_type: settings.price_suggestion_type,
        suggestions: settings.price_suggestion_type.suggestions(),
        server_port: state.config.http_port,
    }))
}
