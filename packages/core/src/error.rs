use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Unified application error.
///
/// Every handler recovers into one of these variants at the boundary;
/// nothing else crosses into the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing request parameter. Surfaced as 400, never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream confirms the resource does not exist. Surfaced as 404.
    #[error("{0}")]
    NotFound(String),

    /// Network failure, timeout, or a non-2xx upstream response other than
    /// not-found. Carries the upstream status when one was received.
    #[error("upstream error: {message}")]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// Missing required credential. Checked before any network attempt.
    #[error("misconfigured: {0}")]
    Misconfigured(String),

    /// Serialization and similar faults inside this service.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is surfaced as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
