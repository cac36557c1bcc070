//! In-process identity provider for tests. Records every call.
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::{CurrentUser, IdentityError, IdentityProvider, SignedIn};
use super::session::Session;

#[derive(Debug, Default)]
pub struct FakeIdentity {
    users: HashMap<String, CurrentUser>,
    roles: HashMap<String, HashSet<String>>,
    failing_tokens: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: &str, id: &str, roles: &[&str]) -> Self {
        self.users.insert(
            token.to_string(),
            CurrentUser {
                id: id.to_string(),
                email: Some(format!("{id}@example.com")),
            },
        );
        self.roles.insert(
            token.to_string(),
            roles.iter().map(|r| r.to_string()).collect(),
        );
        self
    }

    /// Every call with this token fails with a provider error.
    pub fn with_failing_token(mut self, token: &str) -> Self {
        self.failing_tokens.insert(token.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_user(&self, access_token: &str) -> Result<Option<CurrentUser>, IdentityError> {
        self.record(format!("current_user:{access_token}"));
        if self.failing_tokens.contains(access_token) {
            return Err(IdentityError::Status(503));
        }
        Ok(self.users.get(access_token).cloned())
    }

    async fn has_role(&self, access_token: &str, role: &str) -> Result<bool, IdentityError> {
        self.record(format!("has_role:{access_token}:{role}"));
        if self.failing_tokens.contains(access_token) {
            return Err(IdentityError::Status(503));
        }
        Ok(self
            .roles
            .get(access_token)
            .is_some_and(|roles| roles.contains(role)))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError> {
        self.record(format!("sign_in:{email}"));
        let token = format!("{email}:{password}");
        let user = self
            .users
            .get(&token)
            .cloned()
            .ok_or(IdentityError::InvalidCredentials)?;
        Ok(SignedIn {
            session: Session::new(token),
            user,
            expires_in: Some(3600),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.record(format!("sign_out:{access_token}"));
        Ok(())
    }
}
