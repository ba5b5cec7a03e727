//! Error types for thermal-api
//!
//! Every failure is rendered as `{"error": {"code", "message"}}` with a
//! status that distinguishes upstream failures from missing data.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thermal_common::Error as CommonError;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Signed URL rejected (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Record store or object store failed (502)
    #[error("Upstream source unavailable: {0}")]
    SourceUnavailable(String),

    /// Not enough data to compute the requested aggregate (422)
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::SourceUnavailable(msg) => ApiError::SourceUnavailable(msg),
            CommonError::InsufficientData(msg) => ApiError::InsufficientData(msg),
            CommonError::NotFound(msg) => ApiError::NotFound(msg),
            CommonError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::SourceUnavailable(msg) => {
                error!("Upstream source unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, "SOURCE_UNAVAILABLE", msg)
            }
            ApiError::InsufficientData(msg) => {
                warn!("Insufficient data: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_DATA", msg)
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
