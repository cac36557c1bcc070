/*
 * Responsibility
 * - URL と handler の対応表 (全ルートをここに集約)
 * - 認可は access gate が path で判定するので、ここでは route を並べるだけ
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::api::handlers::{auth, chat, consent, health, pages, projects, proxy};
use crate::state::AppState;

pub fn routes(proxy_prefix: &str) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        // pages
        .route("/", get(pages::home))
        .route("/login", get(pages::login_page))
        .route("/dashboard", get(pages::dashboard))
        .route("/admin", get(pages::admin))
        // auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/user", get(auth::current_user))
        // projects
        .route("/dashboard/projects", post(projects::create))
        .route("/dashboard/projects/{name}", delete(projects::delete))
        .route("/dashboard/projects/{name}/config", put(projects::configure))
        .route(
            "/dashboard/projects/{name}/dev-server/start",
            post(projects::start_dev_server),
        )
        .route(
            "/dashboard/projects/{name}/dev-server/stop",
            post(projects::stop_dev_server),
        )
        // chat
        .route(
            "/dashboard/chat/tasks",
            get(chat::list_tasks).post(chat::create_task),
        )
        .route(
            "/dashboard/chat/tasks/{id}/messages",
            post(chat::send_message),
        )
        // consent
        .route(
            "/cookie-preferences",
            get(consent::get_preferences)
                .put(consent::save_preferences)
                .delete(consent::clear_preferences),
        )
        // forwarder
        .route(
            &format!("{proxy_prefix}/{{*path}}"),
            get(proxy::proxy)
                .post(proxy::proxy)
                .put(proxy::proxy)
                .patch(proxy::proxy)
                .delete(proxy::proxy),
        )
}
