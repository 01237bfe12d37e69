//! Label printing handlers

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::Html,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::PriceInput;
use zlp_printer::Transport;

use super::page;
use crate::core::ServerState;
use crate::printing::Outcome;

/// Fields posted by the price entry form
///
/// All fields are free text; blanks and garbage are handled by
/// [`PriceInput::from_form`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrintForm {
    pub oldprice: String,
    pub newprice: String,
    pub discount: String,
    pub printqty: String,
}

impl PrintForm {
    fn to_input(&self) -> PriceInput {
        PriceInput::from_form(&self.oldprice, &self.newprice, &self.discount, &self.printqty)
    }
}

/// JSON print request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrintRequest {
    pub old_price: Option<Decimal>,
    pub new_price: Option<Decimal>,
    /// Fraction off the old price (`0.2` = 20 % off)
    pub discount: Option<Decimal>,
    pub quantity: Option<u32>,
}

impl PrintRequest {
    fn to_input(&self) -> PriceInput {
        PriceInput::new(
            self.old_price,
            self.new_price,
            self.discount,
            self.quantity.unwrap_or(1),
        )
    }
}

/// GET / - price entry form
pub async fn form<T: Transport + 'static>(State(state): State<ServerState<T>>) -> Html<String> {
    Html(page::render(&state.settings, None))
}

/// POST / - print from the form, then show the form again
pub async fn submit_form<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    Form(form): Form<PrintForm>,
) -> Html<String> {
    let outcome = state.printer.handle(&form.to_input()).await;
    Html(page::render(&state.settings, Some(&outcome)))
}

/// POST /api/print - print from a JSON body
pub async fn print<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    Json(request): Json<PrintRequest>,
) -> (StatusCode, Json<ApiResponse<Outcome>>) {
    let outcome = state.printer.handle(&request.to_input()).await;
    let message = outcome.message();

    match outcome {
        Outcome::Printed { .. } => (StatusCode::OK, Json(ApiResponse::ok_with_message(outcome, message))),
        Outcome::Rejected { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error_with_data(message, outcome)),
        ),
        Outcome::Failed { .. } => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::error_with_data(message, outcome)),
        ),
    }
}
