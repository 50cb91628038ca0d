use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use iso_client::domain::RangeError;
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("unknown balancing authority: {0}")]
    NotFound(String),
    #[error("invalid range: {0}")]
    InvalidRange(#[from] RangeError),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::NotFound(_) => "NOT_FOUND",
            GatewayError::InvalidRange(_) => "INVALID_RANGE",
            GatewayError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            GatewayError::Storage(_) => "STORAGE_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Storage(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "request rejected");
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
