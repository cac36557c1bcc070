/*
 * Responsibility
 * - page handler が返す JSON (UI 側が描画に使う)
 */
use serde::Serialize;

use crate::api::dto::auth::UserResponse;
use crate::services::api_client::Project;

#[derive(Debug, Serialize)]
pub struct LandingPage {
    pub page: &'static str,
    pub signed_in: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub user: UserResponse,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct AdminPage {
    pub user: UserResponse,
}
