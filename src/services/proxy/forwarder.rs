use axum::{
    body::Body,
    http::{
        HeaderMap, HeaderValue, Method, Response,
        header::{CONTENT_TYPE, SET_COOKIE},
    },
};
use serde_json::Value;
use url::Url;

use super::body::{ForwardBody, truncate};
use super::error::ProxyError;
use super::headers::{adapt_headers, upstream_host};

const LOG_PREVIEW_CHARS: usize = 200;

/// Everything the forwarder needs from the incoming request.
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    /// Remainder after the proxy prefix, still percent-encoded.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Relays requests to a single upstream origin.
///
/// The origin is injected at construction; nothing here knows a concrete host.
#[derive(Clone, Debug)]
pub struct Forwarder {
    http: reqwest::Client,
    origin: Url,
    host: HeaderValue,
}

/// Join the captured segments into the upstream path.
///
/// Paths without an `api/` prefix are forwarded unchanged; callers that need
/// the upstream's `api/` routes must include the prefix themselves.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim_start_matches('/').to_string();
    if !path.starts_with("api/") {
        tracing::debug!(path = %path, "path has no api/ prefix, forwarding unchanged");
    }
    path
}

impl Forwarder {
    pub fn new(http: reqwest::Client, origin: Url) -> Result<Self, ProxyError> {
        let host = upstream_host(&origin)?;
        Ok(Self { http, origin, host })
    }

    /// `<origin>/<path>[?<query>]`
    ///
    /// `path` is still percent-encoded, so `%3F` / `%2F` stay part of a
    /// segment. Literal dot segments that would leave the origin's base
    /// path are refused.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
        let origin = self.origin.as_str().trim_end_matches('/');
        let mut raw = format!("{origin}/{path}");
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            raw.push('?');
            raw.push_str(query);
        }
        let target =
            Url::parse(&raw).map_err(|e| ProxyError::Internal(format!("invalid target url: {e}")))?;

        let base = format!("{}/", self.origin.path().trim_end_matches('/'));
        if !target.path().starts_with(&base) {
            return Err(ProxyError::Internal(format!(
                "path escapes upstream base {base}: {path}"
            )));
        }
        Ok(target)
    }

    pub async fn forward(&self, req: ForwardRequest) -> Result<Response<Body>, ProxyError> {
        let path = normalize_path(&req.path);
        let target = self.target_url(&path, req.query.as_deref())?;

        tracing::debug!(
            method = %req.method,
            path = %path,
            target = %target,
            "forwarding request"
        );

        let headers = adapt_headers(&req.headers, &self.host);
        let body = ForwardBody::from_request(&req.method, &req.body);
        if body != ForwardBody::Empty {
            tracing::debug!(body = %body.preview(LOG_PREVIEW_CHARS), "forwarded request body");
        }

        let mut outgoing = self
            .http
            .request(req.method.clone(), target.clone())
            .headers(headers);
        if let Some(bytes) = body
            .into_bytes()
            .map_err(|e| ProxyError::Internal(e.to_string()))?
        {
            outgoing = outgoing.body(bytes);
        }

        let upstream = outgoing.send().await.map_err(|e| {
            tracing::warn!(target = %target, error = %e, "upstream request failed");
            ProxyError::Upstream(e.to_string())
        })?;

        translate_response(upstream).await
    }
}

/// Status mirrored, content-type echoed, every `set-cookie` copied.
async fn translate_response(upstream: reqwest::Response) -> Result<Response<Body>, ProxyError> {
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let cookies: Vec<HeaderValue> = upstream
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .cloned()
        .collect();

    let is_json = content_type
        .as_ref()
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let body = if is_json {
        let raw = upstream.bytes().await?;
        if raw.is_empty() {
            Vec::new()
        } else {
            let value: Value = serde_json::from_slice(&raw).map_err(|e| {
                ProxyError::Internal(format!("upstream returned invalid json: {e}"))
            })?;
            serde_json::to_vec(&value).map_err(|e| ProxyError::Internal(e.to_string()))?
        }
    } else {
        upstream.text().await?.into_bytes()
    };

    tracing::debug!(
        status = status.as_u16(),
        body = %truncate(&String::from_utf8_lossy(&body), LOG_PREVIEW_CHARS),
        "upstream response"
    );

    let mut builder = Response::builder().status(status);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    for cookie in cookies {
        builder = builder.header(SET_COOKIE, cookie);
    }

    builder
        .body(Body::from(body))
        .map_err(|e| ProxyError::Internal(e.to_string()))
}
