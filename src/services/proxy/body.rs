//! Outgoing body selection for forwarded requests.

use axum::http::Method;
use serde_json::Value;

/// Body attached to the upstream request.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardBody {
    /// Incoming body decoded as JSON; re-serialised before sending.
    Json(Value),
    /// Not JSON, but valid UTF-8 text.
    Text(String),
    Empty,
}

/// Only these methods ever carry a body upstream.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

impl ForwardBody {
    /// JSON first, then text, then nothing.
    pub fn from_request(method: &Method, bytes: &[u8]) -> Self {
        if !carries_body(method) || bytes.is_empty() {
            return Self::Empty;
        }
        if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
            return Self::Json(value);
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::Text(text.to_owned()),
            Err(_) => Self::Empty,
        }
    }

    pub fn into_bytes(self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        match self {
            Self::Json(value) => serde_json::to_vec(&value).map(Some),
            Self::Text(text) => Ok(Some(text.into_bytes())),
            Self::Empty => Ok(None),
        }
    }

    /// Log-friendly preview, truncated to `max_chars`.
    pub fn preview(&self, max_chars: usize) -> String {
        match self {
            Self::Json(value) => truncate(&value.to_string(), max_chars),
            Self::Text(text) => truncate(text, max_chars),
            Self::Empty => String::new(),
        }
    }
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
