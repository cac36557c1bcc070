/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - config, HTTP clients, identity provider, forwarder, access gate, consent store
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエストごとの可変状態は持たない
 */
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::auth::{Gate, GateScope, RouteRules};
use crate::services::api_client::ApiClient;
use crate::services::consent::ConsentStore;
use crate::services::identity::{IdentityProvider, build_identity_provider};
use crate::services::proxy::Forwarder;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Shared client for the identity provider and the projects API.
    pub http: reqwest::Client,
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub forwarder: Arc<Forwarder>,
    pub gate: Arc<Gate>,
    pub consent: ConsentStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let http = build_http_client()?;
        let identity = build_identity_provider(&config, http.clone());
        Self::assemble(config, http, identity)
    }

    /// Same as `new`, with an explicit identity provider.
    #[cfg(test)]
    pub fn with_identity(
        config: Config,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Result<Self, AppError> {
        let http = build_http_client()?;
        Self::assemble(config, http, identity)
    }

    fn assemble(
        config: Config,
        http: reqwest::Client,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Result<Self, AppError> {
        // The forwarder relays upstream redirects instead of following them.
        let proxy_http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build proxy http client");
                AppError::Internal
            })?;
        let forwarder = Forwarder::new(proxy_http, config.upstream_origin.clone()).map_err(|e| {
            tracing::error!(error = %e, "invalid upstream origin");
            AppError::Internal
        })?;

        let gate = Gate::new(
            RouteRules::dashboard(&config.proxy_prefix),
            GateScope::new(&config.proxy_prefix),
            identity.clone(),
            config.session_cookie.clone(),
        );
        let consent = ConsentStore::new(config.secure_cookies);

        Ok(Self {
            config: Arc::new(config),
            http,
            identity,
            forwarder: Arc::new(forwarder),
            gate: Arc::new(gate),
            consent,
        })
    }

    /// Fresh projects API client bound to one caller's token.
    pub fn api_client(&self, token: Option<&str>) -> ApiClient {
        ApiClient::new(
            self.http.clone(),
            self.config.api_base_url.clone(),
            token.map(str::to_string),
        )
    }

    pub fn identity(&self) -> Result<&Arc<dyn IdentityProvider>, AppError> {
        self.identity.as_ref().ok_or(AppError::IdentityUnavailable)
    }
}

fn build_http_client() -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder().build().map_err(|e| {
        tracing::error!(error = %e, "failed to build http client");
        AppError::Internal
    })
}
