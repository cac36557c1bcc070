/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (access gate → HTTP-level layers)
 * - axum::serve() で起動
 */
use anyhow::Result;
use axum::Router;

use crate::{api, config::Config, middleware, state::AppState};

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let addr = config.addr;
    tracing::info!(
        env = ?config.app_env,
        upstream = %config.upstream_origin,
        proxy_prefix = %config.proxy_prefix,
        identity_configured = config.identity.is_some(),
        "loaded configuration"
    );
    if config.identity.is_none() {
        tracing::warn!("IDENTITY_URL / IDENTITY_PUBLIC_KEY not set: every gated page redirects to /");
    }

    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let routes = api::routes(&config.proxy_prefix);
    let routes = middleware::auth::access::apply(routes, state.clone());

    middleware::http::apply(routes.with_state(state), &config)
}
