//! Application error handling
//!
//! Converts domain errors to HTTP responses with a JSON error body.

use crate::ai::AiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitpulse_shared::types::{ErrorDetail, ErrorResponse};
use fitpulse_shared::validation::ValidationError;
use fitpulse_shared::{AuthError, SessionError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {}", .0.user_message())]
    InvalidField(ValidationError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("AI unavailable: {0}")]
    AiUnavailable(String),

    #[error("AI upstream error: {0}")]
    AiUpstream(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::WrongPassword
            | AuthError::LoginFailed
            | AuthError::InvalidVerificationCode => ApiError::Unauthorized(message),
            AuthError::EmailInUse => ApiError::Conflict(message),
            AuthError::RegistrationNotAllowed => ApiError::Forbidden(message),
            AuthError::MissingName | AuthError::InvalidEmail(_) => ApiError::Validation(message),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::NotFound => ApiError::NotFound(message),
            SessionError::InvalidTransition { .. } => ApiError::Conflict(message),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        let message = err.to_string();
        match err {
            AiError::Disabled => ApiError::AiUnavailable(message),
            AiError::Request(_) | AiError::InvalidResponse(_) => ApiError::AiUpstream(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidField(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::InvalidField(err) => {
                field = Some(err.field.clone());
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.user_message())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::AiUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "AI_UNAVAILABLE", msg.clone())
            }
            ApiError::AiUpstream(msg) => (StatusCode::BAD_GATEWAY, "AI_ERROR", msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
