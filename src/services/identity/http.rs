//! GoTrue-style identity provider reached over HTTP.
//!
//! Endpoints (relative to the configured base URL):
//! - `GET  auth/v1/user`                      current user for a bearer token
//! - `POST auth/v1/token?grant_type=password` password sign-in
//! - `POST auth/v1/logout`                    revoke the session
//! - `POST rest/v1/rpc/has_role`              `{"role_name": ..}` → `true|false`
//!
//! Every request carries the public key in the `apikey` header.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::provider::{CurrentUser, IdentityError, IdentityProvider, SignedIn};
use super::session::Session;

#[derive(Clone)]
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: Url,
    public_key: String,
}

impl std::fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // public key stays out of logs
        f.debug_struct("HttpIdentityProvider")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: CurrentUser,
}

impl HttpIdentityProvider {
    pub fn new(http: reqwest::Client, mut base_url: Url, public_key: impl Into<String>) -> Self {
        // `Url::join` drops the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            public_key: public_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.base_url
            .join(path)
            .map_err(|e| IdentityError::InvalidResponse(format!("bad endpoint {path}: {e}")))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.public_key)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn current_user(&self, access_token: &str) -> Result<Option<CurrentUser>, IdentityError> {
        let url = self.endpoint("auth/v1/user")?;
        let resp = self
            .request(reqwest::Method::GET, url)
            .bearer_auth(access_token)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => {
                let user = resp
                    .json::<CurrentUser>()
                    .await
                    .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
                Ok(Some(user))
            }
            // expired / revoked token: no user, not a provider failure
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            s => Err(IdentityError::Status(s.as_u16())),
        }
    }

    async fn has_role(&self, access_token: &str, role: &str) -> Result<bool, IdentityError> {
        let url = self.endpoint("rest/v1/rpc/has_role")?;
        let resp = self
            .request(reqwest::Method::POST, url)
            .bearer_auth(access_token)
            .json(&json!({ "role_name": role }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }

        resp.json::<bool>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let resp = self
            .request(reqwest::Method::POST, url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => {
                let token = resp
                    .json::<TokenResponse>()
                    .await
                    .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
                Ok(SignedIn {
                    session: Session::new(token.access_token),
                    user: token.user,
                    expires_in: token.expires_in,
                })
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(IdentityError::InvalidCredentials)
            }
            s => Err(IdentityError::Status(s.as_u16())),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let url = self.endpoint("auth/v1/logout")?;
        let resp = self
            .request(reqwest::Method::POST, url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        // an already-invalid token is as good as signed out
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(IdentityError::Status(status.as_u16()))
        }
    }
}
