//! HTTP route handlers for the viewscan server.
//!
//! - `health`: liveness and build information
//! - `views`: template listing, reload and rendering

pub mod health;
pub mod views;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/version", get(health::version))
        .route("/views", get(views::list_views))
        .route("/views/reload", post(views::reload_views))
        .route("/render/{*name}", get(views::render_view))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
