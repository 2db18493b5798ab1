//! # civichub-entity
//!
//! Domain entity models for CivicHub. Database entities derive
//! `sqlx::FromRow`; everything else is a plain value object. The session
//! phase machine shared by the server and the client also lives here.

pub mod account;
pub mod session;
