use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use gazette_sync::engine::CommitError;

/// API error type mapped to the JSON error envelope clients expect.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    /// The commit's remote write failed. The change is already applied
    /// locally; only cross-device freshness is at risk until a retry.
    #[error("save failed: {0}")]
    SaveFailed(#[from] CommitError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::SaveFailed(err) => {
                tracing::warn!("Save failed: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "saveFailed",
                    format!("{err}; the change is stored locally and can be retried"),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
