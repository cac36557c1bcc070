//! Typed client for the projects / chat-task REST API.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    ChatMessage, ChatMessageRequest, ChatTask, CreateChatTask, CreateProject, DevServerStatus,
    Project, ProjectConfig, ProjectList,
};
