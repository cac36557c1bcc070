mod auth_ctx;
mod session;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use session::OptionalSession;
