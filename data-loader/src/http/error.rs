//! HTTP error responses: `{"detail": <status reason>, "message": <human message>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use loader_core::StorageError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected upload: missing field, size, or content type.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn too_large(max_bytes: usize) -> Self {
        Self::Validation(format!(
            "Too large file to upload, maximum size {} MB",
            max_bytes / 1024 / 1024
        ))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(StorageError::TokenInvalid) => StatusCode::UNAUTHORIZED,
            Self::Storage(StorageError::Exhausted { .. } | StorageError::Conflict { .. }) => {
                StatusCode::CONFLICT
            }
            Self::Storage(StorageError::Transport(_) | StorageError::Api { .. }) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Upload failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Upload rejected");
        }
        let body = json!({
            "detail": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("Unknown file type".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StorageError::TokenInvalid).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(StorageError::Exhausted {
                name: "a.xlsx".into(),
                attempts: 10
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StorageError::Transport("reset".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_too_large_message_uses_whole_megabytes() {
        assert_eq!(
            ApiError::too_large(10 * 1024 * 1024).to_string(),
            "Too large file to upload, maximum size 10 MB"
        );
    }
}
