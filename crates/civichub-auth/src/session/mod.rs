//! Login, refresh, and request authorization.

pub mod guard;
pub mod service;

pub use guard::{bearer_token, select_token};
pub use service::{SessionGrant, SessionService};
