/*
 * Responsibility
 * - /cookie-preferences (GET / PUT / DELETE)
 * - 同意状態は cookie のみに保存 (サーバ側には持たない)
 */
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use crate::{
    api::dto::consent::ConsentUpdate,
    error::AppError,
    services::consent::ConsentRecord,
    state::AppState,
};

/// `null` until the visitor has made a choice.
pub async fn get_preferences(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<Option<ConsentRecord>> {
    Json(state.consent.get(&jar))
}

pub async fn save_preferences(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(update): Json<ConsentUpdate>,
) -> Result<(CookieJar, Json<ConsentRecord>), AppError> {
    let record = ConsentRecord::new(
        update.analytics,
        update.marketing,
        update.preferences,
        Utc::now(),
    );
    let jar = state.consent.save(jar, &record).map_err(|e| {
        tracing::error!(error = %e, "failed to encode consent cookie");
        AppError::Internal
    })?;

    Ok((jar, Json(record)))
}

pub async fn clear_preferences(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    (state.consent.remove(jar), StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{HeaderValue, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::super::test_support::{app, body_json, json_request, refused_addr, request};

    #[tokio::test]
    async fn no_cookie_reads_as_null() {
        let addr = refused_addr().await;

        let resp = app(addr, None)
            .oneshot(request("GET", "/cookie-preferences", None, Body::empty()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, Value::Null);
    }

    #[tokio::test]
    async fn saved_preferences_read_back_from_cookie() {
        let addr = refused_addr().await;

        let req = json_request(
            "PUT",
            "/cookie-preferences",
            None,
            &json!({"analytics": true, "marketing": false}),
        );
        let resp = app(addr, None).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.starts_with("cookie_consent="));
        let saved = body_json(resp).await;
        assert_eq!(saved["necessary"], true);
        assert_eq!(saved["analytics"], true);
        assert_eq!(saved["preferences"], false);

        // send the cookie back: name=value part only
        let pair = set_cookie.split(';').next().unwrap();
        let mut req = request("GET", "/cookie-preferences", None, Body::empty());
        req.headers_mut()
            .insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        let resp = app(addr, None).oneshot(req).await.unwrap();

        assert_eq!(body_json(resp).await, saved);
    }

    #[tokio::test]
    async fn delete_expires_cookie() {
        let addr = refused_addr().await;

        let resp = app(addr, None)
            .oneshot(request("DELETE", "/cookie-preferences", None, Body::empty()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("cookie_consent=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
