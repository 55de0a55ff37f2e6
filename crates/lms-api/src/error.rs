//! Mapping of failures to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lms_core::{DomainError, ErrorKind};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            ApiError::Domain(err) => match err.kind() {
                ErrorKind::Validation => {
                    tracing::warn!("Validation failed: {}", err);
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", validation_message(err))
                }
                ErrorKind::NotFound => {
                    tracing::warn!("Not found: {}", err);
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                ErrorKind::Conflict => {
                    tracing::warn!("Conflict: {}", err);
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                }
                ErrorKind::Forbidden => {
                    tracing::warn!("Forbidden: {}", err);
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
                }
                ErrorKind::UpstreamFailure => {
                    tracing::error!("Upstream failure: {}", err);
                    match err {
                        DomainError::IdentityProviderError(_) => (
                            StatusCode::BAD_GATEWAY,
                            "UPSTREAM_FAILURE",
                            "Identity provider unavailable".to_string(),
                        ),
                        _ => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            "Internal server error".to_string(),
                        ),
                    }
                }
            },
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

fn validation_message(err: DomainError) -> String {
    match err {
        DomainError::ValidationError(msg) => msg,
        other => other.to_string(),
    }
}
