use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Payment already completed: {0}")]
    PaymentCompleted(String),

    #[error("Verification unavailable: {0}")]
    VerificationUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::InvalidPayload(msg) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", msg),
            AppError::PaymentFailed(msg) => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_FAILED", msg),
            AppError::PaymentCompleted(msg) => (StatusCode::CONFLICT, "PAYMENT_COMPLETED", msg),
            AppError::VerificationUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "VERIFICATION_UNAVAILABLE",
                msg,
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
