pub mod auth;
pub mod chat;
pub mod consent;
pub mod health;
pub mod pages;
pub mod projects;
pub mod proxy;

#[cfg(test)]
mod test_support;
