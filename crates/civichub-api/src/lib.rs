//! # civichub-api
//!
//! HTTP API layer for CivicHub built on Axum.
//!
//! Provides the session endpoints (login, verify, logout), administrator
//! account management, the authorization guard extractors, middleware
//! (CORS, security headers, request logging), DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
