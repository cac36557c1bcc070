pub mod access;
pub mod rules;

pub use access::Gate;
pub use rules::{GateScope, RouteRules};
