//! In-memory storage.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use civichub_core::result::AppResult;

use super::{CredentialSlot, RecordStore};

/// Process-local store. Clones share the same maps, so a cache rebuilt from
/// a clone sees what the previous one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<String, Value>>,
    slots: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record with `name` is present.
    pub fn has_record(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self, name: &str) -> AppResult<Option<Value>> {
        Ok(self.records.get(name).map(|entry| entry.value().clone()))
    }

    async fn save(&self, name: &str, value: &Value) -> AppResult<()> {
        self.records.insert(name.to_string(), value.clone());
        Ok(())
    }

    async fn purge(&self, name: &str) -> AppResult<()> {
        self.records.remove(name);
        Ok(())
    }
}

#[async_trait]
impl CredentialSlot for MemoryStore {
    async fn get(&self, slot: &str) -> AppResult<Option<String>> {
        Ok(self.slots.get(slot).map(|entry| entry.value().clone()))
    }

    async fn set(&self, slot: &str, value: &str) -> AppResult<()> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, slot: &str) -> AppResult<()> {
        self.slots.remove(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.save("r", &json!({"a": 1})).await.unwrap();
        other.set("token", "t").await.unwrap();

        assert_eq!(other.load("r").await.unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("t"));

        other.purge("r").await.unwrap();
        assert!(!store.has_record("r"));
    }
}
