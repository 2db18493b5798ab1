//! Filesystem-backed storage.
//!
//! ```text
//! <base_dir>/
//! ├── records/
//! │   └── <name>.json
//! └── slots/
//!     └── <slot>
//! ```

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use civichub_core::config::ClientConfig;
use civichub_core::error::AppError;
use civichub_core::result::AppResult;

use super::{CredentialSlot, RecordStore};

/// One file per record or slot under a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base`. Directories are created lazily.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Create a store rooted at the configured storage directory.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.storage_dir)
    }

    /// Root directory of this store.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn record_path(&self, name: &str) -> AppResult<PathBuf> {
        check_name(name)?;
        Ok(self.base.join("records").join(format!("{name}.json")))
    }

    fn slot_path(&self, slot: &str) -> AppResult<PathBuf> {
        check_name(slot)?;
        Ok(self.base.join("slots").join(slot))
    }

    async fn write(path: &Path, contents: &[u8]) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Written beside the target, then renamed into place.
        let staging = path.with_extension("tmp");
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, path).await?;
        Ok(())
    }

    async fn read(path: &Path) -> AppResult<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(path: &Path) -> AppResult<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn check_name(name: &str) -> AppResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !name.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid storage name: {name:?}")))
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn load(&self, name: &str) -> AppResult<Option<Value>> {
        let path = self.record_path(name)?;
        match Self::read(&path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, name: &str, value: &Value) -> AppResult<()> {
        let path = self.record_path(name)?;
        let bytes = serde_json::to_vec_pretty(value)?;
        Self::write(&path, &bytes).await?;
        tracing::trace!(name, path = %path.display(), "Saved record");
        Ok(())
    }

    async fn purge(&self, name: &str) -> AppResult<()> {
        let path = self.record_path(name)?;
        Self::delete(&path).await
    }
}

#[async_trait]
impl CredentialSlot for FileStore {
    async fn get(&self, slot: &str) -> AppResult<Option<String>> {
        let path = self.slot_path(slot)?;
        match Self::read(&path).await? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| AppError::internal(format!("Credential slot is not UTF-8: {e}"))),
            None => Ok(None),
        }
    }

    async fn set(&self, slot: &str, value: &str) -> AppResult<()> {
        let path = self.slot_path(slot)?;
        Self::write(&path, value.as_bytes()).await
    }

    async fn remove(&self, slot: &str) -> AppResult<()> {
        let path = self.slot_path(slot)?;
        Self::delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scratch() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("civichub-store-{}", uuid::Uuid::new_v4())))
    }

    #[tokio::test]
    async fn test_record_round_trip_and_purge() {
        let store = scratch();
        assert!(store.load("admin-storage").await.unwrap().is_none());

        let value = json!({ "user": null, "is_authenticated": false });
        store.save("admin-storage", &value).await.unwrap();
        assert_eq!(store.load("admin-storage").await.unwrap(), Some(value));

        store.purge("admin-storage").await.unwrap();
        assert!(store.load("admin-storage").await.unwrap().is_none());
        store.purge("admin-storage").await.unwrap();

        let _ = tokio::fs::remove_dir_all(store.base()).await;
    }

    #[tokio::test]
    async fn test_slot_round_trip() {
        let store = scratch();
        store.set("token", "abc").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));
        store.set("token", "def").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("def"));
        store.remove("token").await.unwrap();
        assert!(store.get("token").await.unwrap().is_none());

        let _ = tokio::fs::remove_dir_all(store.base()).await;
    }

    #[tokio::test]
    async fn test_path_like_names_are_rejected() {
        let store = scratch();
        assert!(store.get("../etc/passwd").await.is_err());
        assert!(store.load("a/b").await.is_err());
        assert!(store.set("", "x").await.is_err());
    }
}
