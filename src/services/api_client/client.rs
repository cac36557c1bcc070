use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use super::error::ApiError;
use super::types::{
    ChatMessage, ChatMessageRequest, ChatTask, CreateChatTask, CreateProject, DevServerStatus,
    Project, ProjectConfig, ProjectList,
};

/// Projects / chat API client.
///
/// A value per request (or per session): it carries its own base URL and
/// bearer token and is never mutated after construction. Build a new one
/// when the session changes.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: Url, token: Option<String>) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Base URL + percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(builder).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        self.send_json(self.request(Method::POST, url).json(body))
            .await
    }

    pub async fn list_projects(&self) -> Result<ProjectList, ApiError> {
        self.get(&["api", "projects"]).await
    }

    pub async fn create_project(&self, req: &CreateProject) -> Result<Project, ApiError> {
        self.post(&["api", "projects"], req).await
    }

    pub async fn delete_project(&self, name: &str) -> Result<(), ApiError> {
        let url = self.url(&["api", "projects", name])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    pub async fn configure_project(
        &self,
        name: &str,
        config: &ProjectConfig,
    ) -> Result<Project, ApiError> {
        let url = self.url(&["api", "projects", name, "config"])?;
        self.send_json(self.request(Method::PUT, url).json(config))
            .await
    }

    pub async fn start_dev_server(&self, name: &str) -> Result<DevServerStatus, ApiError> {
        self.post(&["api", "projects", name, "dev-server", "start"], &())
            .await
    }

    pub async fn stop_dev_server(&self, name: &str) -> Result<DevServerStatus, ApiError> {
        self.post(&["api", "projects", name, "dev-server", "stop"], &())
            .await
    }

    pub async fn create_chat_task(&self, req: &CreateChatTask) -> Result<ChatTask, ApiError> {
        self.post(&["api", "chat", "tasks"], req).await
    }

    pub async fn list_chat_tasks(&self, project: Option<&str>) -> Result<Vec<ChatTask>, ApiError> {
        let mut url = self.url(&["api", "chat", "tasks"])?;
        if let Some(project) = project {
            url.query_pairs_mut().append_pair("project", project);
        }
        self.send_json(self.request(Method::GET, url)).await
    }

    pub async fn send_chat_message(
        &self,
        task_id: &str,
        req: &ChatMessageRequest,
    ) -> Result<ChatMessage, ApiError> {
        self.post(&["api", "chat", "tasks", task_id, "messages"], req)
            .await
    }
}
