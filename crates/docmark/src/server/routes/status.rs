//! Status polling and reset endpoints

use axum::{extract::State, Json};
use std::collections::BTreeMap;

use crate::server::state::AppState;
use crate::types::{ClearResponse, JobRecord, StatusReport};

/// GET /api/status - Every tracked path with its current record
pub async fn get_status(State(state): State<AppState>) -> Json<BTreeMap<String, JobRecord>> {
    let snapshot = state
        .dispatcher()
        .status()
        .into_iter()
        .map(|(path, record)| (path.to_string_lossy().into_owned(), record))
        .collect();
    Json(snapshot)
}

/// GET /api/status/summary - Counts per state and records newest first
pub async fn get_summary(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.dispatcher().report())
}

/// POST /api/clear - Discard all status records
pub async fn clear_status(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(state.dispatcher().clear_status())
}
