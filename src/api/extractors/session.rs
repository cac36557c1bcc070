//! Session token for handlers on public paths.
//!
//! Reads the cookie / bearer header only; never calls the identity provider.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::identity::Session;
use crate::state::AppState;

pub struct OptionalSession(pub Option<Session>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // malformed credentials read as "no session" here
        let session = Session::from_headers(&parts.headers, &state.config.session_cookie)
            .ok()
            .flatten();
        Ok(OptionalSession(session))
    }
}
