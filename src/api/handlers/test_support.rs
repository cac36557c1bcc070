//! Router-level test helpers: throwaway upstream servers and app construction.
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, header},
    response::Response,
};

use crate::app::build_router;
use crate::config::Config;
use crate::services::identity::IdentityProvider;
use crate::state::AppState;

pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn refused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Full application router with the given upstream and identity provider.
pub fn app(upstream: SocketAddr, identity: Option<Arc<dyn IdentityProvider>>) -> Router {
    let has_identity = identity.is_some();
    let config = Config::from_lookup(|key| match key {
        "UPSTREAM_ORIGIN" => Some(format!("http://{upstream}")),
        "IDENTITY_URL" if has_identity => Some("http://id.invalid".into()),
        "IDENTITY_PUBLIC_KEY" if has_identity => Some("anon".into()),
        _ => None,
    })
    .unwrap();

    build_router(AppState::with_identity(config, identity).unwrap())
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    if let Some(token) = token {
        req.headers_mut().insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("access_token={token}")).unwrap(),
        );
    }
    req
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut req = request(method, uri, token, Body::from(body.to_string()));
    req.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    req
}

pub async fn body_bytes(resp: Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}
