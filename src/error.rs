//! Error types for the moderation gateway

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while handling a gateway request
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Client key missing, empty, or not in the configured allow-list
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Required server-side configuration is absent
    #[error("Server misconfigured: {0}")]
    Misconfigured(String),

    /// Request body missing or malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failure reaching the upstream model or parsing its response
    #[error("{0}")]
    Upstream(String),
}

impl GatewayError {
    /// HTTP status the error maps to
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Misconfigured(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
