//! Preview references.
//!
//! A renderer shows staged files through an opaque reference (an object URL
//! in a browser). References hold memory until released, so the pipeline
//! tracks every one it creates.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use uuid::Uuid;

use super::StagedFile;

/// Creates and releases preview references.
pub trait ReferenceRegistry: Send + Sync + std::fmt::Debug {
    /// Create a reference for `file`.
    fn create(&self, file: &StagedFile) -> String;

    /// Release a reference. Returns `false` if it was unknown or already
    /// released.
    fn release(&self, url: &str) -> bool;
}

/// In-process registry that counts what it hands out.
#[derive(Debug, Default)]
pub struct MemoryReferenceRegistry {
    live: DashMap<String, usize>,
    created: AtomicUsize,
    released: AtomicUsize,
}

impl MemoryReferenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// References created so far.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Acquire)
    }

    /// References released so far.
    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::Acquire)
    }

    /// References currently held.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Bytes held by live references.
    pub fn live_bytes(&self) -> usize {
        self.live.iter().map(|e| *e.value()).sum()
    }

    /// Whether `url` is still live.
    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains_key(url)
    }
}

impl ReferenceRegistry for MemoryReferenceRegistry {
    fn create(&self, file: &StagedFile) -> String {
        let url = format!("blob:civichub/{}", Uuid::new_v4());
        self.live.insert(url.clone(), file.len());
        self.created.fetch_add(1, Ordering::AcqRel);
        url
    }

    fn release(&self, url: &str) -> bool {
        if self.live.remove(url).is_some() {
            self.released.fetch_add(1, Ordering::AcqRel);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_release_is_noop() {
        let registry = MemoryReferenceRegistry::new();
        let file = StagedFile::new("a.png", "image/png", vec![0u8; 16]);
        let url = registry.create(&file);

        assert!(registry.is_live(&url));
        assert_eq!(registry.live_bytes(), 16);
        assert!(registry.release(&url));
        assert!(!registry.release(&url));
        assert_eq!(registry.created_count(), 1);
        assert_eq!(registry.released_count(), 1);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_unknown_release_is_noop() {
        let registry = MemoryReferenceRegistry::new();
        assert!(!registry.release("blob:civichub/unknown"));
        assert_eq!(registry.released_count(), 0);
    }
}
