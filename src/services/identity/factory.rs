//! Factory: build the identity provider from application `Config`.
//!
//! `None` when `IDENTITY_URL` / `IDENTITY_PUBLIC_KEY` are not both set;
//! the access gate treats that as a misconfigured deployment.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{HttpIdentityProvider, IdentityProvider};

pub fn build_identity_provider(
    config: &Config,
    http: reqwest::Client,
) -> Option<Arc<dyn IdentityProvider>> {
    let identity = config.identity.as_ref()?;

    tracing::info!(url = %identity.url, "identity provider configured");
    Some(Arc::new(HttpIdentityProvider::new(
        http,
        identity.url.clone(),
        identity.public_key.clone(),
    )))
}
