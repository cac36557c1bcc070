pub mod auth;
pub mod chat;
pub mod consent;
pub mod pages;
