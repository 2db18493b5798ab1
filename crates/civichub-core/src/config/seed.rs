//! One-time administrator seed configuration.

use serde::{Deserialize, Serialize};

/// Credentials for the administrator created by `civichub-cli seed`.
///
/// Every field is optional so the seed command can prompt for what is
/// missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Administrator username.
    #[serde(default)]
    pub admin_username: Option<String>,
    /// Administrator email.
    #[serde(default)]
    pub admin_email: Option<String>,
    /// Administrator password.
    #[serde(default, skip_serializing)]
    pub admin_password: Option<String>,
}
