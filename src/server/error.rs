//! Host Error Types
//!
//! Errors raised by the dev host, converted to HTTP responses. The body uses
//! the same `{"error": ...}` shape as the prediction API so the UI shows the
//! message like any other failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// The prediction backend could not be reached or answered garbage
    #[error("Prediction service unavailable: {0}")]
    BadGateway(String),

    /// The request could not be forwarded as given
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub request_id: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ServerError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Host error occurred"
        );

        let body = ErrorResponse {
            error: self.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for host operations
pub type ServerResult<T> = Result<T, ServerError>;
