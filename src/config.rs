/*
 * Responsibility
 * - 環境変数や設定の読み込み (UPSTREAM_ORIGIN, IDENTITY_*, cookie 設定など)
 * - 設定値のバリデーション (不正なら起動失敗)
 * - identity provider 設定は欠けていても起動する (gate が "/" へ redirect する)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

pub const DEFAULT_UPSTREAM_ORIGIN: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PROXY_PREFIX: &str = "/api/proxy";
pub const DEFAULT_SESSION_COOKIE: &str = "access_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity provider endpoint + public (anon) key.
///
/// Only built when both values are present.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub url: Url,
    pub public_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub upstream_origin: Url,
    pub proxy_prefix: String,
    pub api_base_url: Url,

    pub identity: Option<IdentityConfig>,
    pub session_cookie: String,
    pub secure_cookies: bool,

    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` is the only production caller.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or(AppEnv::Development);

        let upstream_origin = parse_origin(
            lookup("UPSTREAM_ORIGIN").as_deref(),
            DEFAULT_UPSTREAM_ORIGIN,
            "UPSTREAM_ORIGIN",
        )?;

        let proxy_prefix = normalize_prefix(
            &lookup("PROXY_PREFIX").unwrap_or_else(|| DEFAULT_PROXY_PREFIX.to_string()),
        )
        .ok_or(ConfigError::Invalid("PROXY_PREFIX"))?;

        let api_base_url = match lookup("API_BASE_URL") {
            Some(raw) => Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid("API_BASE_URL"))?,
            None => upstream_origin.clone(),
        };

        let identity_url = lookup("IDENTITY_URL").filter(|s| !s.trim().is_empty());
        let identity_key = lookup("IDENTITY_PUBLIC_KEY").filter(|s| !s.trim().is_empty());
        let identity = match (identity_url, identity_key) {
            (Some(url), Some(public_key)) => Some(IdentityConfig {
                url: Url::parse(url.trim()).map_err(|_| ConfigError::Invalid("IDENTITY_URL"))?,
                public_key: public_key.trim().to_string(),
            }),
            _ => None,
        };

        let session_cookie = lookup("SESSION_COOKIE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

        let secure_cookies = match lookup("SECURE_COOKIES") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("SECURE_COOKIES"))?,
            None => app_env.is_production(),
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => Duration::from_secs(
                parse_positive(&raw).ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            ),
            None => Duration::from_secs(30),
        };

        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(raw) => parse_positive(&raw).ok_or(ConfigError::Invalid("BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            upstream_origin,
            proxy_prefix,
            api_base_url,
            identity,
            session_cookie,
            secure_cookies,
            request_timeout,
            body_limit_bytes,
        })
    }
}

fn parse_origin(raw: Option<&str>, default: &str, key: &'static str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.unwrap_or(default).trim()).map_err(|_| ConfigError::Invalid(key))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::Invalid(key));
    }
    Ok(url)
}

// "/api/proxy/" → "/api/proxy", "api/proxy" → "/api/proxy"
fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("/{}", trimmed))
}

// 0 は「全リクエストが即 timeout / 空 body 以外すべて拒否」になるので不正扱い
fn parse_positive<T>(raw: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    raw.trim().parse::<T>().ok().filter(|v| *v > T::default())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
