//! # civichub-database
//!
//! PostgreSQL connection management, migrations, and the account
//! repository (Postgres-backed and in-memory).

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{AccountRepository, MemoryAccountRepository, PgAccountRepository};
