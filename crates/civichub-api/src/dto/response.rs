//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use civichub_auth::SessionGrant;
use civichub_entity::account::AccountView;

/// Body of login and verify responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The authenticated account.
    pub user: AccountView,
    /// Signed session token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

impl From<SessionGrant> for SessionResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            user: grant.user,
            token: grant.token,
            expires_at: grant.expires_at,
        }
    }
}

/// A single account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    /// The account.
    pub admin: AccountView,
    /// Optional status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// All accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminListResponse {
    /// Accounts, newest first.
    pub admins: Vec<AccountView>,
}

/// Plain status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the state was built.
    pub uptime_seconds: u64,
}
