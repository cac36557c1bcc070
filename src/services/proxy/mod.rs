//! Request forwarding to the configured upstream origin.
//!
//! One linear pass per request:
//! receive → normalize path → adapt headers/body → forward once → translate response.

pub mod body;
pub mod error;
pub mod forwarder;
pub mod headers;

pub use error::ProxyError;
pub use forwarder::{ForwardRequest, Forwarder};
