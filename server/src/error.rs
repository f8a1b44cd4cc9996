//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use shelf_engine::ValidationError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Invalid(vec![err])
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Build a JSON error response.
pub fn error_response(status: StatusCode, message: String, details: Option<Value>) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
        details,
    });

    (status, body).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Invalid(errors) => {
                tracing::debug!("Invalid request: {}", join_errors(&errors));
                let message = join_errors(&errors);
                let details = serde_json::to_value(&errors).ok();
                error_response(StatusCode::BAD_REQUEST, message, details)
            }
            AppError::UnknownCollection(name) => error_response(
                StatusCode::NOT_FOUND,
                format!("Unknown collection {}", name),
                None,
            ),
        }
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
