//! Label printing routes

mod handler;
mod page;

use axum::{
    Router,
    routing::{get, post},
};
use zlp_printer::Transport;

use crate::core::ServerState;

pub use handler::{PrintForm, PrintRequest};

pub fn router<T: Transport + 'static>() -> Router<ServerState<T>> {
    Router::new()
        .route("/", get(handler::form::<T>).post(handler::submit_form::<T>))
        .route("/api/print", post(handler::print::<T>))
}
