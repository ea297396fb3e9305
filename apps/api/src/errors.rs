use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::optimization::optimizer::OptimizeError;
use crate::session::store::SessionError;

/// Contact shown alongside every error message.
pub const SUPPORT_CONTACT: &str = "contact@offerai.co";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Optimize(#[from] OptimizeError),

    #[error("Session store error: {0}")]
    Session(#[from] SessionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Please sign in to continue.".to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Ingest(e) => {
                let (status, code) = match e {
                    IngestError::UnsupportedFormat(_) => {
                        (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT")
                    }
                    IngestError::EmptyDocument(_) => (StatusCode::BAD_REQUEST, "EMPTY_DOCUMENT"),
                    IngestError::ExtractionFailed(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Optimize(e) => {
                let (status, code) = match e {
                    OptimizeError::MissingCredential => {
                        tracing::error!("Optimization service credential is not configured");
                        (StatusCode::SERVICE_UNAVAILABLE, "MISSING_CREDENTIAL")
                    }
                    OptimizeError::EmptyResponse => (StatusCode::BAD_GATEWAY, "EMPTY_RESPONSE"),
                    OptimizeError::MalformedResponse(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_RESPONSE")
                    }
                    OptimizeError::Service(msg) => {
                        tracing::error!("Optimization service error: {msg}");
                        (StatusCode::BAD_GATEWAY, "SERVICE_ERROR")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Session(e) => {
                tracing::error!("Session store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SESSION_ERROR",
                    "Your session could not be saved. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "support": SUPPORT_CONTACT
            }
        }));

        (status, body).into_response()
    }
}
