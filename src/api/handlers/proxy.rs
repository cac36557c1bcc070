/*
 * Responsibility
 * - {PROXY_PREFIX}/{*path} の catch-all handler (GET/POST/PUT/PATCH/DELETE)
 * - incoming request を ForwardRequest に詰め替えて Forwarder に渡すだけ
 * - path は decode せず、受け取ったままの形で upstream に渡す
 * - エラーは ProxyError が 502/500 の JSON に変換する (呼び出し元へは投げない)
 */
use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::services::proxy::{ForwardRequest, ProxyError};
use crate::state::AppState;

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE";

pub async fn proxy(
    State(state): State<AppState>,
    req: Request<Body>,
) -> Result<Response, ProxyError> {
    // axum の get() は HEAD も受けるので、ここで弾く
    if req.method() == Method::HEAD {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, ALLOWED_METHODS)],
        )
            .into_response());
    }

    let (parts, body) = req.into_parts();
    let path = parts
        .uri
        .path()
        .strip_prefix(state.config.proxy_prefix.as_str())
        .filter(|rest| rest.starts_with('/'))
        .map(str::to_string)
        .ok_or_else(|| {
            ProxyError::Internal(format!("path outside proxy prefix: {}", parts.uri.path()))
        })?;

    let body = axum::body::to_bytes(body, state.config.body_limit_bytes)
        .await
        .map_err(|e| ProxyError::Internal(format!("failed to read request body: {e}")))?;

    let forward = ForwardRequest {
        method: parts.method,
        path,
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body: body.to_vec(),
    };

    state.forwarder.forward(forward).await
}
