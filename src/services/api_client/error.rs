use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors from the projects API.
///
/// `Status` means the API answered with a non-2xx status; the message is
/// whatever the API put in its error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("api returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("api transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid api response: {0}")]
    Decode(String),
    #[error("api base url cannot carry a path")]
    InvalidBaseUrl,
}

impl ApiError {
    /// Build a `Status` error from a failed response body.
    ///
    /// Looks for `detail`, `message` or `error` string fields, then falls
    /// back to the raw text, then to the status reason.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        });

        let message = from_json
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Self::Status { status, message }
    }
}
