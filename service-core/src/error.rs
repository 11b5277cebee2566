use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to callers for every 5xx; the cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Failure half of the response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub is_success: bool,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error = match self {
            AppError::ValidationError(message) => message,
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Request failed with internal error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = ?err, "Request failed with configuration error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (
            status,
            Json(ErrorResponse {
                is_success: false,
                error,
            }),
        )
            .into_response()
    }
}
