//! Transient user notifications.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use civichub_core::config::ClientConfig;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
    /// Operation completed in a degraded way.
    Warning,
    /// Informational.
    Info,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Toast identifier.
    pub id: Uuid,
    /// Text shown to the user.
    pub message: String,
    /// Severity.
    pub kind: ToastKind,
    /// When the toast was pushed.
    pub created_at: DateTime<Utc>,
}

/// Shared toast queue. Clones push to and read from the same queue.
#[derive(Debug, Clone)]
pub struct Notifier {
    toasts: Arc<DashMap<Uuid, Toast>>,
    lifetime: chrono::Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

impl Notifier {
    /// Create a notifier whose toasts expire after `lifetime`.
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: Arc::new(DashMap::new()),
            lifetime: chrono::Duration::from_std(lifetime).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Create a notifier with the configured toast lifetime.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(Duration::from_millis(config.toast_lifetime_ms))
    }

    /// Queue a toast and return its id.
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> Uuid {
        self.push_at(kind, message, Utc::now())
    }

    /// Queue a toast stamped with `now`.
    pub fn push_at(&self, kind: ToastKind, message: impl Into<String>, now: DateTime<Utc>) -> Uuid {
        let toast = Toast {
            id: Uuid::now_v7(),
            message: message.into(),
            kind,
            created_at: now,
        };
        tracing::debug!(kind = ?toast.kind, message = %toast.message, "Toast");
        let id = toast.id;
        self.toasts.insert(id, toast);
        id
    }

    /// Shorthand for a success toast.
    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Success, message)
    }

    /// Shorthand for an error toast.
    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Error, message)
    }

    /// Shorthand for a warning toast.
    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Warning, message)
    }

    /// Shorthand for an info toast.
    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Info, message)
    }

    /// Remove a toast before it expires. Returns whether it was present.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.toasts.remove(&id).is_some()
    }

    /// Toasts still visible at `now`, oldest first. Expired toasts are
    /// dropped from the queue.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let lifetime = self.lifetime;
        self.toasts.retain(|_, toast| now - toast.created_at < lifetime);

        let mut toasts: Vec<Toast> = self.toasts.iter().map(|e| e.value().clone()).collect();
        toasts.sort_by_key(|t| (t.created_at, t.id));
        toasts
    }

    /// Every queued toast regardless of age, oldest first.
    pub fn all(&self) -> Vec<Toast> {
        let mut toasts: Vec<Toast> = self.toasts.iter().map(|e| e.value().clone()).collect();
        toasts.sort_by_key(|t| (t.created_at, t.id));
        toasts
    }
}
