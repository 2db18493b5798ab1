//! Local persistence for the session record and the credential slot.
//!
//! Records are JSON documents addressed by name. Credential slots hold a
//! single opaque string. Both survive process restarts when backed by
//! [`FileStore`]; [`MemoryStore`] is for tests and ephemeral clients.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use civichub_core::result::AppResult;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

/// Named JSON documents.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read a record. `None` if it was never saved or has been purged.
    async fn load(&self, name: &str) -> AppResult<Option<Value>>;

    /// Write a record, replacing any previous value.
    async fn save(&self, name: &str, value: &Value) -> AppResult<()>;

    /// Remove a record entirely. Purging an absent record succeeds.
    async fn purge(&self, name: &str) -> AppResult<()>;
}

/// Named single-value secrets, such as the bearer token.
#[async_trait]
pub trait CredentialSlot: Send + Sync {
    /// Read the slot.
    async fn get(&self, slot: &str) -> AppResult<Option<String>>;

    /// Overwrite the slot.
    async fn set(&self, slot: &str, value: &str) -> AppResult<()>;

    /// Empty the slot. Removing an empty slot succeeds.
    async fn remove(&self, slot: &str) -> AppResult<()>;
}
