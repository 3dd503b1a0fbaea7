//! API routes for the conversion server

pub mod convert;
pub mod status;

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/convert", post(convert::submit_paths))
        .route("/status", get(status::get_status))
        .route("/status/summary", get(status::get_summary))
        .route("/clear", post(status::clear_status))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let stats = state.dispatcher().pool().stats();
    axum::Json(serde_json::json!({
        "name": "docmark",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Queue-backed document to Markdown conversion",
        "workers": stats.capacity,
        "queue": stats,
        "supported_extensions": state.config().processing.supported_extensions,
        "endpoints": {
            "POST /api/convert": "Queue files, directories or wildcard patterns",
            "GET /api/status": "Current record for every tracked path",
            "GET /api/status/summary": "Counts per state and records newest first",
            "POST /api/clear": "Discard all status records"
        }
    }))
}
