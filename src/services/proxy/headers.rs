//! Header adaptation for forwarded requests.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{ACCEPT_ENCODING, CONNECTION, CONTENT_LENGTH, HOST},
};
use url::Url;

use super::error::ProxyError;

/// `host[:port]` of the upstream origin, ready to be used as a `Host` header.
pub fn upstream_host(origin: &Url) -> Result<HeaderValue, ProxyError> {
    let host = origin
        .host_str()
        .ok_or_else(|| ProxyError::Internal(format!("upstream origin has no host: {origin}")))?;
    let authority = match origin.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    HeaderValue::from_str(&authority).map_err(|e| ProxyError::Internal(e.to_string()))
}

/// Copy every incoming header except `host`, `connection` and `content-length`,
/// then pin `host` to the upstream authority.
///
/// `accept-encoding` is dropped as well: the client negotiates only the
/// encodings it decodes, so the relayed body is always plain.
///
/// `HeaderName` is lowercase-normalised, so the exclusion is case-insensitive.
/// Repeated headers keep all their values.
pub fn adapt_headers(incoming: &HeaderMap, upstream_host: &HeaderValue) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(incoming.len());
    for (name, value) in incoming {
        if *name == HOST
            || *name == CONNECTION
            || *name == CONTENT_LENGTH
            || *name == ACCEPT_ENCODING
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out.insert(HOST, upstream_host.clone());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{ACCEPT, COOKIE};

    #[test]
    fn drops_excluded_headers_and_rewrites_host() {
        let mut incoming = HeaderMap::new();
        incoming.insert(HOST, HeaderValue::from_static("dashboard.local"));
        incoming.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        incoming.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
        incoming.insert(ACCEPT, HeaderValue::from_static("application/json"));
        incoming.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br, zstd"),
        );
        incoming.append(COOKIE, HeaderValue::from_static("a=1"));
        incoming.append(COOKIE, HeaderValue::from_static("b=2"));

        let host = HeaderValue::from_static("api.internal:8000");
        let out = adapt_headers(&incoming, &host);

        assert_eq!(out.get(HOST).unwrap(), "api.internal:8000");
        assert!(out.get(CONNECTION).is_none());
        assert!(out.get(CONTENT_LENGTH).is_none());
        assert!(out.get(ACCEPT_ENCODING).is_none());
        assert_eq!(out.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(out.get_all(COOKIE).iter().count(), 2);
    }

    #[test]
    fn host_is_set_even_when_absent() {
        let host = HeaderValue::from_static("api.internal");
        let out = adapt_headers(&HeaderMap::new(), &host);
        assert_eq!(out.get(HOST).unwrap(), "api.internal");
    }

    #[test]
    fn upstream_host_includes_explicit_port_only() {
        let with_port = Url::parse("http://127.0.0.1:8000").unwrap();
        assert_eq!(upstream_host(&with_port).unwrap(), "127.0.0.1:8000");

        let default_port = Url::parse("https://api.example.com").unwrap();
        assert_eq!(upstream_host(&default_port).unwrap(), "api.example.com");
    }
}
