use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Every failure a request can surface, translated exactly once into an
/// HTTP response. Client-caused (4xx) errors render `"status": "fail"`,
/// server-caused (5xx) errors render `"status": "error"`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No video file provided")]
    MissingFile,

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File exceeds the maximum upload size of {0} MB")]
    PayloadTooLarge(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Video processing failed: {0}")]
    TranscodeFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Artifact store unavailable")]
    StoreUnavailable(String),

    #[error("Unauthorized: Invalid API key")]
    Unauthorized,

    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingFile
            | AppError::UnsupportedMediaType(_)
            | AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::TranscodeFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::StoreUnavailable(detail) => {
                tracing::error!("artifact store unavailable: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Artifact store unavailable".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(e) => {
                tracing::error!("unexpected error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        // The auth failure body is fixed to `"error"` regardless of class.
        let kind = if matches!(self, AppError::Unauthorized) || status.is_server_error() {
            "error"
        } else {
            "fail"
        };

        let body = Json(json!({
            "status": kind,
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MissingFile.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PayloadTooLarge(100).into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::NotFound("Video not found".into())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::TranscodeFailed("boom".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::RateLimited.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_size_limit_message_reports_megabytes() {
        let err = AppError::PayloadTooLarge(100);
        assert_eq!(
            err.to_string(),
            "File exceeds the maximum upload size of 100 MB"
        );
    }
}
