//! API error types and conversions

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::types::ErrorResponse;
use crate::snapshot::SnapshotError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// The snapshot is missing or unreadable
    SnapshotUnavailable(String),

    /// Resource not found
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::SnapshotUnavailable(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "snapshot not available".to_string(),
                    detail: Some(detail),
                },
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "not found".to_string(),
                    detail: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        ApiError::SnapshotUnavailable(err.to_string())
    }
}
