use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Forwarder failures. Never escapes the proxy handler: both variants render
/// as structured JSON.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream could not be reached (connect / transport failure).
    #[error("upstream unreachable: {0}")]
    Upstream(String),
    /// Anything else: unreadable request body, bad target URL, undecodable upstream JSON.
    #[error("proxy failure: {0}")]
    Internal(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Upstream(message) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "status": "error",
                    "message": "Could not connect to the target API",
                    "error": message,
                })),
            )
                .into_response(),
            ProxyError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Proxy error",
                    "message": message,
                })),
            )
                .into_response(),
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() || e.is_builder() {
            ProxyError::Internal(e.to_string())
        } else {
            ProxyError::Upstream(e.to_string())
        }
    }
}
