use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::{BackendError, BackendResponse};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                envelope(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::ExternalServiceError(msg) => {
                tracing::error!("External service error: {}", msg);
                envelope(StatusCode::BAD_GATEWAY, msg)
            }
        }
    }
}

/// Error body in the same `{data, error, status}` shape the user API returns
fn envelope(status: StatusCode, message: impl Into<String>) -> Response {
    let body = BackendResponse::<()>::failed(status.as_u16(), BackendError::new(message));
    (status, Json(body)).into_response()
}

pub type Result<T> = std::result::Result<T, AppError>;
