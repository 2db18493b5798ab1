//! Claims carried by a session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use civichub_entity::account::{Account, AccountRole, AccountView};

/// JWT payload of every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account ID.
    pub sub: Uuid,
    /// Account email at issuance.
    pub email: String,
    /// Account role at issuance.
    pub role: AccountRole,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the account ID from the subject claim.
    pub fn account_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at `now`. The boundary second counts
    /// as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Whether the token grants admin access.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// The identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// Account ID.
    pub id: Uuid,
    /// Account email.
    pub email: String,
    /// Account role.
    pub role: AccountRole,
}

impl From<&Account> for TokenSubject {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
        }
    }
}

impl From<&AccountView> for TokenSubject {
    fn from(view: &AccountView) -> Self {
        Self {
            id: view.id,
            email: view.email.clone(),
            role: view.role,
        }
    }
}
