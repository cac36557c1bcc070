pub mod factory;
pub mod http;
pub mod provider;
pub mod session;

#[cfg(test)]
pub mod fake;

pub use factory::build_identity_provider;
pub use http::HttpIdentityProvider;
pub use provider::{CurrentUser, IdentityError, IdentityProvider, SignedIn};
pub use session::{CredentialsError, Session};
