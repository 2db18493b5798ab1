//! Account repository trait and its implementations.

pub mod account;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use civichub_core::result::AppResult;
use civichub_entity::account::{Account, AccountChanges, NewAccount};

pub use account::PgAccountRepository;
pub use memory::MemoryAccountRepository;

/// Persistence for [`Account`] rows.
///
/// Implementations enforce email and username uniqueness and report
/// violations as `Conflict`. Secrets only arrive pre-hashed.
#[async_trait]
pub trait AccountRepository: Send + Sync + std::fmt::Debug {
    /// Find an account by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find an account by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find an account by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// List every account, newest first.
    async fn list(&self) -> AppResult<Vec<Account>>;

    /// Insert a new account.
    async fn create(&self, data: NewAccount) -> AppResult<Account>;

    /// Apply a partial update. `NotFound` when the id does not exist.
    async fn update(&self, id: Uuid, changes: AccountChanges) -> AppResult<Account>;

    /// Delete an account. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Number of stored accounts.
    async fn count(&self) -> AppResult<u64>;
}
