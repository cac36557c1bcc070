//! Session token extraction from an incoming request.
//!
//! The session is opaque to this service: it is just the access token the
//! identity provider issued, carried either in the session cookie or as a
//! bearer token.

use axum::http::{HeaderMap, header};
use axum_extra::extract::CookieJar;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("authorization header is not valid ascii")]
    MalformedAuthorization,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Cookie wins over `Authorization: Bearer`.
    ///
    /// Returns `Ok(None)` when the request carries no session at all.
    pub fn from_headers(
        headers: &HeaderMap,
        cookie_name: &str,
    ) -> Result<Option<Self>, CredentialsError> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(cookie_name) {
            let value = cookie.value().trim();
            if !value.is_empty() {
                return Ok(Some(Self::new(value)));
            }
        }

        let Some(raw) = headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };
        let raw = raw
            .to_str()
            .map_err(|_| CredentialsError::MalformedAuthorization)?;

        Ok(raw
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Self::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=tok-1"),
        );

        let session = Session::from_headers(&headers, "access_token").unwrap();
        assert_eq!(session, Some(Session::new("tok-1")));
    }

    #[test]
    fn falls_back_to_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok-2"),
        );

        let session = Session::from_headers(&headers, "access_token").unwrap();
        assert_eq!(session, Some(Session::new("tok-2")));
    }

    #[test]
    fn no_credentials_is_not_an_error() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));

        assert_eq!(Session::from_headers(&headers, "access_token"), Ok(None));
        assert_eq!(
            Session::from_headers(&HeaderMap::new(), "access_token"),
            Ok(None)
        );
    }

    #[test]
    fn non_ascii_authorization_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff").unwrap(),
        );

        assert_eq!(
            Session::from_headers(&headers, "access_token"),
            Err(CredentialsError::MalformedAuthorization)
        );
    }
}
