//! Cookie consent record stored client-side in a path-scoped cookie.
//!
//! The record is JSON, base64url-encoded so it survives cookie value rules
//! (no quotes, commas or semicolons). Expiry is 180 days from the last save.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Duration as TimeDuration;

pub const CONSENT_COOKIE: &str = "cookie_consent";
pub const CONSENT_MAX_AGE_DAYS: i64 = 180;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// Strictly necessary cookies cannot be declined.
    pub necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub preferences: bool,
    pub updated_at: DateTime<Utc>,
}

impl ConsentRecord {
    pub fn new(analytics: bool, marketing: bool, preferences: bool, now: DateTime<Utc>) -> Self {
        Self {
            necessary: true,
            analytics,
            marketing,
            preferences,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("consent cookie is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("consent cookie is not a consent record: {0}")]
    Record(#[from] serde_json::Error),
}

pub fn encode(record: &ConsentRecord) -> Result<String, ConsentError> {
    let json = serde_json::to_vec(record)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode(value: &str) -> Result<ConsentRecord, ConsentError> {
    let bytes = URL_SAFE_NO_PAD.decode(value.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Debug, Clone, Copy)]
pub struct ConsentStore {
    secure: bool,
}

impl ConsentStore {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// An unreadable cookie counts as "no decision yet".
    pub fn get(&self, jar: &CookieJar) -> Option<ConsentRecord> {
        let cookie = jar.get(CONSENT_COOKIE)?;
        match decode(cookie.value()) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unreadable consent cookie");
                None
            }
        }
    }

    pub fn save(&self, jar: CookieJar, record: &ConsentRecord) -> Result<CookieJar, ConsentError> {
        let mut record = record.clone();
        record.necessary = true;

        let cookie = Cookie::build((CONSENT_COOKIE, encode(&record)?))
            .path("/")
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::days(CONSENT_MAX_AGE_DAYS));

        Ok(jar.add(cookie))
    }

    pub fn remove(&self, jar: CookieJar) -> CookieJar {
        let cookie = Cookie::build((CONSENT_COOKIE, ""))
            .path("/")
            .max_age(TimeDuration::ZERO);
        jar.add(cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ConsentRecord {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        ConsentRecord::new(true, false, true, now)
    }

    #[test]
    fn saved_cookie_is_path_scoped_with_180_day_expiry() {
        let store = ConsentStore::new(true);
        let jar = store.save(CookieJar::new(), &record()).unwrap();

        let cookie = jar.get(CONSENT_COOKIE).unwrap();
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(TimeDuration::days(180)));
        assert_eq!(cookie.secure(), Some(true));
        assert!(!cookie.value().contains(['"', ',', ';']));
    }

    #[test]
    fn get_reads_back_saved_record() {
        let store = ConsentStore::new(false);
        let jar = store.save(CookieJar::new(), &record()).unwrap();

        assert_eq!(store.get(&jar), Some(record()));
    }

    #[test]
    fn necessary_is_forced_on() {
        let store = ConsentStore::new(false);
        let mut declined = record();
        declined.necessary = false;

        let jar = store.save(CookieJar::new(), &declined).unwrap();
        assert!(store.get(&jar).unwrap().necessary);
    }

    #[test]
    fn garbage_cookie_reads_as_absent() {
        let store = ConsentStore::new(false);
        let jar = CookieJar::new().add(Cookie::new(CONSENT_COOKIE, "not-a-record"));

        assert_eq!(store.get(&jar), None);
        assert!(decode("not-a-record").is_err());
    }

    #[test]
    fn remove_expires_the_cookie() {
        let store = ConsentStore::new(false);
        let jar = store.save(CookieJar::new(), &record()).unwrap();
        let jar = store.remove(jar);

        let cookie = jar.get(CONSENT_COOKIE).unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(TimeDuration::ZERO));
        assert_eq!(store.get(&jar), None);
    }
}
