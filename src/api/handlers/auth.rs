/*
 * Responsibility
 * - /api/auth 系 handler (login / logout / 現在のユーザー)
 * - gate 上は public なので、必要な identity 呼び出しは handler 自身が行う
 * - session cookie の発行・削除
 */
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration as TimeDuration;

use crate::{
    api::{
        dto::auth::{LoginRequest, UserResponse},
        extractors::OptionalSession,
    },
    error::AppError,
    middleware::auth::access::HOME_PATH,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_LOGIN", m))?;

    let signed_in = state
        .identity()?
        .sign_in(req.email.trim(), &req.password)
        .await?;

    let mut cookie = Cookie::build((
        state.config.session_cookie.clone(),
        signed_in.session.access_token,
    ))
    .path("/")
    .http_only(true)
    .secure(state.config.secure_cookies)
    .same_site(SameSite::Lax);
    if let Some(seconds) = signed_in.expires_in {
        cookie = cookie.max_age(TimeDuration::seconds(seconds));
    }

    tracing::info!(user_id = %signed_in.user.id, "signed in");
    Ok((jar.add(cookie), Json(signed_in.user.into())))
}

/// Sign out at the provider (best effort) and drop the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    jar: CookieJar,
) -> impl IntoResponse {
    if let (Some(session), Some(identity)) = (session, state.identity.as_ref())
        && let Err(err) = identity.sign_out(&session.access_token).await
    {
        tracing::warn!(error = %err, "sign out at identity provider failed");
    }

    let remove = Cookie::build((state.config.session_cookie.clone(), ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    (jar.add(remove), Redirect::to(HOME_PATH))
}

pub async fn current_user(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
) -> Result<Json<UserResponse>, AppError> {
    let session = session.ok_or(AppError::Unauthorized)?;
    let user = state
        .identity()?
        .current_user(&session.access_token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(user.into()))
}
