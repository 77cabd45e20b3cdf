//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every error response uses the same JSON envelope:
//!
//! ```json
//! {"error": {"code": "NOT_FOUND", "message": "...", "details": {...}}}
//! ```
//!
//! `details` is only present where the caller can act on it: extraction
//! failures and persistence failures. Internal and upstream failures are
//! logged and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::db::RepositoryError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "INVALID_PROOF").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Required fields missing or malformed (400).
    #[error("{0}")]
    Validation(String),

    /// Request body could not be parsed, or names something unsupported (400).
    #[error("{0}")]
    BadRequest(String),

    /// The submitted proof could not be unwrapped (400).
    #[error("Failed to extract proof data")]
    ExtractionFailed(String),

    /// The verifier rejected the proof, or could not be asked (400).
    #[error("Proof verification failed - invalid signatures")]
    InvalidProof,

    /// Missing or unresolvable bearer token (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Caller does not own the resource (403).
    #[error("{0}")]
    Forbidden(String),

    /// The verification record could not be written (500).
    #[error("Failed to store verification")]
    Persistence(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),

    /// A required external service failed (502). Message is logged only.
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::ExtractionFailed(_) => (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED"),
            Self::InvalidProof => (StatusCode::BAD_REQUEST, "INVALID_PROOF"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::ExtractionFailed(reason) | Self::Persistence(reason) => {
                Some(json!({ "reason": reason }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Upstream(_) => "An upstream service is unavailable".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) | Self::Upstream(_) => {
                tracing::error!(error = %self, "server error");
            }
            Self::Persistence(reason) => {
                tracing::error!(reason = %reason, "failed to store verification");
            }
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (AppError::ExtractionFailed("x".into()), StatusCode::BAD_REQUEST, "EXTRACTION_FAILED"),
            (AppError::InvalidProof, StatusCode::BAD_REQUEST, "INVALID_PROOF"),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (AppError::Persistence("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            (AppError::Upstream("x".into()), StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code), "{err:?}");
        }
    }

    #[tokio::test]
    async fn extraction_failure_carries_reason() {
        let (status, body) =
            response_parts(AppError::ExtractionFailed("no proof with claimData found".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.message, "Failed to extract proof data");
        assert_eq!(
            body.error.details.unwrap()["reason"],
            "no proof with claimData found"
        );
    }

    #[tokio::test]
    async fn persistence_failure_carries_reason() {
        let (status, body) = response_parts(AppError::Persistence("disk full".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, "Failed to store verification");
        assert_eq!(body.error.details.unwrap()["reason"], "disk full");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let (status, body) = response_parts(AppError::Internal("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn upstream_hides_details() {
        let (status, body) = response_parts(AppError::Upstream("connect refused".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.error.message.contains("refused"));
    }

    #[tokio::test]
    async fn client_errors_echo_message() {
        let (_, body) = response_parts(AppError::Forbidden("You do not own this social account".into())).await;
        assert_eq!(body.error.message, "You do not own this social account");
        assert!(body.error.details.is_none());
    }

    #[test]
    fn error_body_omits_empty_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
