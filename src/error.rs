/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - ApiError / IdentityError を handler 向けに統一的に変換
 *
 * Notes
 * - proxy の 502/500 は body 形状が異なるため services::proxy::ProxyError 側で扱う
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::api_client::ApiError;
use crate::services::identity::IdentityError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("identity provider is not configured")]
    IdentityUnavailable,
    #[error("upstream api returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::IdentityUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "IDENTITY_UNAVAILABLE",
                "identity provider is not configured".into(),
            ),
            AppError::Upstream { status, message } => (status, "UPSTREAM_ERROR", message),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            // The API answered; keep its status so the dashboard can show it.
            ApiError::Status { status, message } => AppError::Upstream { status, message },
            ApiError::Transport(err) => {
                tracing::warn!(error = %err, "projects api unreachable");
                AppError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    message: "projects api unreachable".into(),
                }
            }
            other => {
                tracing::error!(error = %other, "projects api call failed");
                AppError::Internal
            }
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidCredentials => AppError::Unauthorized,
            other => {
                tracing::warn!(error = %other, "identity provider call failed");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_errors_keep_their_status() {
        let err: AppError = ApiError::Status {
            status: StatusCode::CONFLICT,
            message: "project exists".into(),
        }
        .into();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_credentials_map_to_unauthorized() {
        let err: AppError = IdentityError::InvalidCredentials.into();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
