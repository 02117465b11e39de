//! HTTP route handlers.

pub mod health;
pub mod helpers;
pub mod metrics;
pub mod publishing;

use axum::Router;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions::session_store::SessionStore;

use crate::state::AppState;

/// Build the application router with all routes and layers.
pub fn build_router<S: SessionStore + Clone>(
    state: AppState,
    session_layer: SessionManagerLayer<S>,
) -> Router {
    Router::new()
        .merge(health::router())
        .merge(metrics::router())
        .merge(publishing::router())
        // Middleware layers (last added = first executed in request flow):
        // TraceLayer → session → routes
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
