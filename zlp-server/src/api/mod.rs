//! HTTP routes
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | `/` | GET | price entry form |
//! | `/` | POST | form submission, prints a label |
//! | `/api/print` | POST | JSON print request |
//! | `/api/settings` | GET | active settings |
//! | `/api/scan` | POST | printer discovery |
//! | `/health` | GET | liveness and uptime |
//! | `/stop` | GET | graceful shutdown |

pub mod health;
pub mod labels;
pub mod scan;
pub mod settings;
pub mod system;

use axum::Router;
use tower_http::trace::TraceLayer;
use zlp_printer::Transport;

use crate::core::ServerState;

/// All routes, without state
pub fn build_router<T: Transport + 'static>() -> Router<ServerState<T>> {
    Router::new()
        .merge(labels::router())
        .merge(settings::router())
        .merge(scan::router())
        .merge(health::router())
        .merge(system::router())
}

/// Router with middleware and state, ready to serve
///
/// Used by [`crate::Server`] and by in-process `oneshot` calls in tests.
pub fn build_app<T: Transport + 'static>(state: ServerState<T>) -> Router {
    build_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
