//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two listeners, two Axum routers. The gesture port upgrades every request
//! to a websocket (the camera client connects to `/`, browsers may use
//! `/ws`). The page port serves the single HUD document plus a health check.

pub mod page;
pub mod ws;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Websocket routes served by the hub.
pub fn gesture_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(ws::handle_ws))
        .route("/ws", get(ws::handle_ws))
        .with_state(state)
}

/// Static HUD page routes.
pub fn page_app(index_html: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(page::index))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(page::PageState::new(index_html))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
