/*
 * Responsibility
 * - /dashboard/chat 配下 (chat task の一覧 / 作成 / メッセージ送信)
 * - 空の prompt / content は API に送らず 400
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::{dto::chat::ChatTaskQuery, extractors::AuthCtxExtractor},
    error::AppError,
    services::api_client::{ChatMessage, ChatMessageRequest, ChatTask, CreateChatTask},
    state::AppState,
};

pub async fn list_tasks(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<ChatTaskQuery>,
) -> Result<Json<Vec<ChatTask>>, AppError> {
    let tasks = state
        .api_client(Some(ctx.access_token()))
        .list_chat_tasks(query.project.as_deref())
        .await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateChatTask>,
) -> Result<(StatusCode, Json<ChatTask>), AppError> {
    if req.project.trim().is_empty() {
        return Err(AppError::bad_request("INVALID_TASK", "project is required"));
    }
    if req.prompt.trim().is_empty() {
        return Err(AppError::bad_request("INVALID_TASK", "prompt is required"));
    }

    let task = state
        .api_client(Some(ctx.access_token()))
        .create_chat_task(&req)
        .await?;

    tracing::info!(task_id = %task.id, project = %req.project, "chat task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn send_message(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(task_id): Path<String>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::bad_request("INVALID_MESSAGE", "content is required"));
    }

    let message = state
        .api_client(Some(ctx.access_token()))
        .send_chat_message(&task_id, &req)
        .await?;
    Ok(Json(message))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        Json, Router,
        body::Body,
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::super::test_support::{app, body_json, json_request, request, spawn_upstream};
    use crate::services::identity::fake::FakeIdentity;

    fn api() -> Router {
        Router::new()
            .route(
                "/api/chat/tasks",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let project = q.get("project").cloned().unwrap_or_else(|| "all".into());
                    Json(json!([{"id": "t-1", "project": project}]))
                })
                .post(|Json(body): Json<Value>| async move {
                    Json(json!({"id": "t-2", "project": body["project"], "status": "queued"}))
                }),
            )
            .route(
                "/api/chat/tasks/{id}/messages",
                post(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                    Json(json!({
                        "role": "user",
                        "content": format!("{id}: {}", body["content"].as_str().unwrap_or_default()),
                        "created_at": "2026-03-01T12:00:00Z"
                    }))
                }),
            )
    }

    fn identity() -> Arc<FakeIdentity> {
        Arc::new(FakeIdentity::new().with_user("tok", "u-1", &[]))
    }

    #[tokio::test]
    async fn list_tasks_forwards_project_filter() {
        let addr = spawn_upstream(api()).await;

        let req = request("GET", "/dashboard/chat/tasks?project=blog", Some("tok"), Body::empty());
        let resp = app(addr, Some(identity())).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await[0]["project"], "blog");
    }

    #[tokio::test]
    async fn create_task_returns_201() {
        let addr = spawn_upstream(api()).await;

        let req = json_request(
            "POST",
            "/dashboard/chat/tasks",
            Some("tok"),
            &json!({"project": "blog", "prompt": "add a footer"}),
        );
        let resp = app(addr, Some(identity())).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["id"], "t-2");
        assert_eq!(body["status"], "queued");
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected() {
        let addr = spawn_upstream(api()).await;

        let req = json_request(
            "POST",
            "/dashboard/chat/tasks",
            Some("tok"),
            &json!({"project": "blog", "prompt": "   "}),
        );
        let resp = app(addr, Some(identity())).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn send_message_returns_api_message() {
        let addr = spawn_upstream(api()).await;

        let req = json_request(
            "POST",
            "/dashboard/chat/tasks/t-1/messages",
            Some("tok"),
            &json!({"content": "hello"}),
        );
        let resp = app(addr, Some(identity())).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["content"], "t-1: hello");
        assert_eq!(body["created_at"], "2026-03-01T12:00:00Z");
    }
}
