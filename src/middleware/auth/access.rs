//! Access gate: decide before any page/API handler runs whether the request
//! may proceed, and redirect it otherwise.
//!
//! Order of checks (each strictly before the next):
//! 1. route classification: public paths pass with no identity call
//! 2. identity provider configured? if not → `/`
//! 3. session → current user; no user → `/login`
//! 4. admin paths: `admin` or `superadmin` role; neither → `/dashboard`
//!
//! Any gate error redirects to `/` (fail closed to a public page).
//! Allowed requests get an `AuthCtx` in extensions for the `AuthCtxExtractor`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::extractors::AuthCtx;
use crate::middleware::auth::rules::{GateScope, RouteClass, RouteRules};
use crate::services::identity::{CredentialsError, IdentityProvider, Session};
use crate::state::AppState;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

pub const ADMIN_ROLES: [&str; 2] = ["admin", "superadmin"];

#[derive(Debug, Clone)]
pub enum GateDecision {
    /// `Some` for gated paths (the resolved caller), `None` for public ones.
    Allow(Option<AuthCtx>),
    Redirect(&'static str),
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("malformed credentials: {0}")]
    Credentials(#[from] CredentialsError),
}

/// Gate configuration + collaborators. Built once at startup.
pub struct Gate {
    rules: RouteRules,
    scope: GateScope,
    identity: Option<Arc<dyn IdentityProvider>>,
    session_cookie: String,
}

impl Gate {
    pub fn new(
        rules: RouteRules,
        scope: GateScope,
        identity: Option<Arc<dyn IdentityProvider>>,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            rules,
            scope,
            identity,
            session_cookie: session_cookie.into(),
        }
    }

    pub fn applies(&self, path: &str) -> bool {
        self.scope.applies(path)
    }

    pub async fn evaluate(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<GateDecision, GateError> {
        let class = self.rules.classify(path);
        if class == RouteClass::Public {
            return Ok(GateDecision::Allow(None));
        }

        let Some(identity) = &self.identity else {
            tracing::warn!(path = %path, "identity provider not configured, redirecting home");
            return Ok(GateDecision::Redirect(HOME_PATH));
        };

        let session = Session::from_headers(headers, &self.session_cookie)?;
        let user = match &session {
            Some(session) => match identity.current_user(&session.access_token).await {
                Ok(user) => user,
                Err(err) => {
                    // logged, then handled like "no user"
                    tracing::warn!(error = %err, "failed to resolve current user");
                    None
                }
            },
            None => None,
        };

        let (Some(session), Some(user)) = (session, user) else {
            tracing::debug!(path = %path, "no session, redirecting to login");
            return Ok(GateDecision::Redirect(LOGIN_PATH));
        };

        if class == RouteClass::Admin {
            let mut granted = false;
            for role in ADMIN_ROLES {
                granted |= has_role(identity.as_ref(), &session, role).await;
            }
            if !granted {
                tracing::debug!(path = %path, user_id = %user.id, "missing admin role");
                return Ok(GateDecision::Redirect(DASHBOARD_PATH));
            }
        }

        Ok(GateDecision::Allow(Some(AuthCtx::new(user, session))))
    }
}

/// A failed role lookup counts as "role not held".
async fn has_role(identity: &dyn IdentityProvider, session: &Session, role: &str) -> bool {
    match identity.has_role(&session.access_token, role).await {
        Ok(granted) => granted,
        Err(err) => {
            tracing::warn!(role = %role, error = %err, "role check failed");
            false
        }
    }
}

/// 302 with a `Location` header.
pub fn redirect(to: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to)]).into_response()
}

/// Apply the gate to every route of `router`; `GateScope` decides which
/// paths it actually inspects.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if !state.gate.applies(&path) {
        return next.run(req).await;
    }

    let decision = state.gate.evaluate(&path, req.headers()).await;
    match decision {
        Ok(GateDecision::Allow(ctx)) => {
            if let Some(ctx) = ctx {
                // middleware → extractor への受け渡し
                req.extensions_mut().insert(ctx);
            }
            next.run(req).await
        }
        Ok(GateDecision::Redirect(to)) => redirect(to),
        Err(err) => {
            tracing::warn!(path = %path, error = %err, "access gate failed, redirecting home");
            redirect(HOME_PATH)
        }
    }
}
