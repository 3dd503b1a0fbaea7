//! Batch admission endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{SubmitRequest, SubmitResponse};

/// POST /api/convert - Queue every file the given paths resolve to
pub async fn submit_paths(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>> {
    tracing::info!("Received {} path entries", request.paths.len());

    // Resolution touches the filesystem; keep it off the async workers
    let dispatcher = state.dispatcher().clone();
    let response = tokio::task::spawn_blocking(move || dispatcher.submit(&request.paths))
        .await
        .map_err(|e| Error::internal(format!("Admission task failed: {}", e)))??;

    Ok(Json(response))
}
