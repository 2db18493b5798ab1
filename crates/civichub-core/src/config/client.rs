//! Client-side session cache and upload staging configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the client library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Directory holding the persisted session record and credential slot.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
    /// Name of the persisted session record.
    #[serde(default = "default_record_name")]
    pub record_name: String,
    /// Name of the credential slot holding the token.
    #[serde(default = "default_token_slot")]
    pub token_slot: String,
    /// How long a toast stays visible, in milliseconds.
    #[serde(default = "default_toast_lifetime")]
    pub toast_lifetime_ms: u64,
    /// Upload staging settings.
    #[serde(default)]
    pub staging: StagingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            storage_dir: default_storage_dir(),
            record_name: default_record_name(),
            token_slot: default_token_slot(),
            toast_lifetime_ms: default_toast_lifetime(),
            staging: StagingConfig::default(),
        }
    }
}

/// Media preprocessing and selection behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Longest edge, in pixels, an image may keep before being downscaled.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// JPEG re-encode quality (1-100).
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Whether a new selection replaces the previous one.
    #[serde(default = "default_true")]
    pub single_selection: bool,
    /// Whether submitting requires staged media.
    #[serde(default = "default_true")]
    pub media_required: bool,
    /// Upper bound on active previews when multiple selection is enabled.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            quality: default_quality(),
            single_selection: true,
            media_required: true,
            max_files: default_max_files(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_storage_dir() -> String {
    "data/client".to_string()
}

fn default_record_name() -> String {
    "admin-storage".to_string()
}

fn default_token_slot() -> String {
    "token".to_string()
}

fn default_toast_lifetime() -> u64 {
    3000
}

fn default_max_dimension() -> u32 {
    1920
}

fn default_quality() -> u8 {
    80
}

fn default_max_files() -> usize {
    8
}

fn default_true() -> bool {
    true
}
