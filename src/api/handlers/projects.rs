/*
 * Responsibility
 * - /dashboard/projects 配下の操作 (作成 / 削除 / 設定 / dev server 起動停止)
 * - 呼び出し元の token で projects API を叩くだけ。結果やエラーの status はそのまま返す
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::extractors::AuthCtxExtractor,
    error::AppError,
    services::api_client::{CreateProject, DevServerStatus, Project, ProjectConfig},
    state::AppState,
};

pub async fn create(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateProject>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_PROJECT", m))?;

    let project = state
        .api_client(Some(ctx.access_token()))
        .create_project(&req)
        .await?;

    tracing::info!(project = %project.name, user_id = %ctx.user.id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .api_client(Some(ctx.access_token()))
        .delete_project(&name)
        .await?;

    tracing::info!(project = %name, user_id = %ctx.user.id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn configure(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(name): Path<String>,
    Json(config): Json<ProjectConfig>,
) -> Result<Json<Project>, AppError> {
    let project = state
        .api_client(Some(ctx.access_token()))
        .configure_project(&name, &config)
        .await?;
    Ok(Json(project))
}

pub async fn start_dev_server(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(name): Path<String>,
) -> Result<Json<DevServerStatus>, AppError> {
    let status = state
        .api_client(Some(ctx.access_token()))
        .start_dev_server(&name)
        .await?;
    Ok(Json(status))
}

pub async fn stop_dev_server(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(name): Path<String>,
) -> Result<Json<DevServerStatus>, AppError> {
    let status = state
        .api_client(Some(ctx.access_token()))
        .stop_dev_server(&name)
        .await?;
    Ok(Json(status))
}
