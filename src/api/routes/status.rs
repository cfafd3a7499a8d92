//! Snapshot endpoint

use axum::{Json, extract::State};
use serde_json::Value;

use crate::api::{error::ApiResult, state::ApiState};

/// GET /api/status
///
/// Returns the snapshot document exactly as the monitor wrote it
pub async fn get_status(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let document = state.store.load_document().await?;
    Ok(Json(document))
}
