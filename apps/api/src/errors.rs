use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::error::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::UnsupportedFormat(_) => AppError::UnsupportedFormat(e.to_string()),
            AnalysisError::DocumentTooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            AnalysisError::ExtractionFailed(_) => AppError::UnprocessableEntity(e.to_string()),
            AnalysisError::InvalidJobProfile(_) => AppError::Validation(e.to_string()),
            // Non-fatal by contract; analyzers degrade instead of erroring.
            // Reaching here means a bug upstream, so fail loudly.
            AnalysisError::AiProviderUnavailable(msg) => {
                AppError::Internal(anyhow::anyhow!("AI provider error escaped merger: {msg}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", msg.clone())
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "DOCUMENT_TOO_LARGE",
                msg.clone(),
            ),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
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
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_stable_kinds() {
        let cases = [
            (
                AnalysisError::UnsupportedFormat("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AnalysisError::DocumentTooLarge {
                    limit: 10,
                    actual: 20,
                },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                AnalysisError::ExtractionFailed("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AnalysisError::InvalidJobProfile("x".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (engine_error, expected_status) in cases {
            let response = AppError::from(engine_error).into_response();
            assert_eq!(response.status(), expected_status);
        }
    }
}
