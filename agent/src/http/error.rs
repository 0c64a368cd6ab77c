//! API error type and its JSON rendering.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use wakehost_common::{ActionResponse, ErrorResponse};

use crate::domain::{KeepAliveError, RequestError};

/// Errors a handler or middleware can end a request with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,

    /// Client error with an operation-style `{success:false, message}` body.
    #[error("{0}")]
    BadRequest(String),

    /// Server-side operation failure, same body shape as `BadRequest`.
    #[error("{0}")]
    OperationFailed(String),
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<KeepAliveError> for ApiError {
    fn from(err: KeepAliveError) -> Self {
        match err {
            KeepAliveError::AlreadyRunning | KeepAliveError::NotRunning => {
                Self::BadRequest(err.to_string())
            }
            KeepAliveError::Launch(_) => Self::OperationFailed(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal | Self::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        match self {
            Self::BadRequest(message) | Self::OperationFailed(message) => (
                status,
                Json(ActionResponse {
                    success: false,
                    message,
                }),
            )
                .into_response(),
            other => (
                status,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// Turn a handler panic into a generic 500 without leaking its payload.
#[allow(clippy::needless_pass_by_value)] // signature required by CatchPanicLayer
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "request handler panicked");
    ApiError::Internal.into_response()
}
