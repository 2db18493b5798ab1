//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;

pub use auth::{AdminUser, AuthUser};
pub use json::ApiJson;
pub use path::AccountId;
