/*
 * Responsibility
 * - ページ系 handler (/, /login, /dashboard, /admin)
 * - UI 側に渡す JSON を組み立てるだけ。アクセス制御は access gate が済ませている
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::pages::{AdminPage, DashboardPage, LandingPage},
        extractors::{AuthCtxExtractor, OptionalSession},
    },
    error::AppError,
    state::AppState,
};

pub async fn home(OptionalSession(session): OptionalSession) -> Json<LandingPage> {
    Json(LandingPage {
        page: "home",
        signed_in: session.is_some(),
    })
}

pub async fn login_page(OptionalSession(session): OptionalSession) -> Json<LandingPage> {
    Json(LandingPage {
        page: "login",
        signed_in: session.is_some(),
    })
}

/// Dashboard: the caller plus their projects, fetched with the caller's token.
pub async fn dashboard(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<DashboardPage>, AppError> {
    let list = state
        .api_client(Some(ctx.access_token()))
        .list_projects()
        .await?;

    Ok(Json(DashboardPage {
        user: ctx.user.into(),
        projects: list.projects,
    }))
}

pub async fn admin(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<AdminPage> {
    Json(AdminPage {
        user: ctx.user.into(),
    })
}
