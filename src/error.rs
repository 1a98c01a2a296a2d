//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::activity::EventLogError;
use crate::estimate::ErrorResponse;
use crate::speech::SpeechError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body could not be parsed into the expected shape
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Activity log error: {0}")]
    EventLog(#[from] EventLogError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            AppError::Speech(SpeechError::NotConfigured) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SpeechUnavailable")
            }
            AppError::Speech(_) => (StatusCode::BAD_GATEWAY, "SpeechProvider"),
            AppError::EventLog(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let message = match &self {
            AppError::Validation(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                msg.clone()
            }
            AppError::Speech(e) => {
                tracing::warn!("Speech error: {}", e);
                e.to_string()
            }
            AppError::EventLog(e) => {
                tracing::error!("Activity log error: {}", e);
                "Activity log unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
