//! Health check endpoint

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::{state::ApiState, types::HealthResponse};

/// GET /health
///
/// Reports whether the snapshot can currently be read
pub async fn health_check(State(state): State<ApiState>) -> Response {
    match state.store.load_document().await {
        Ok(_) => Json(HealthResponse {
            ok: true,
            ts: Some(chrono::Utc::now().to_rfc3339()),
            error: None,
        })
        .into_response(),
        Err(e) => {
            warn!("health check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    ok: false,
                    ts: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
