//! Stateless session service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use civichub_core::error::AppError;
use civichub_core::result::AppResult;
use civichub_entity::account::{Account, AccountView};

use crate::credential::CredentialStore;
use crate::jwt::{Claims, TokenCodec, TokenSubject};

use super::guard::select_token;

/// What a successful login or refresh hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionGrant {
    /// The authenticated account.
    pub user: AccountView,
    /// Signed session token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Exchanges credentials for tokens and authorizes requests.
#[derive(Debug, Clone)]
pub struct SessionService {
    store: CredentialStore,
    codec: TokenCodec,
}

impl SessionService {
    /// Creates the service.
    pub fn new(store: CredentialStore, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    /// The credential store behind this service.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// The token codec behind this service.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Verifies credentials and issues a token.
    ///
    /// Every credential failure yields the same `Unauthorized` message so
    /// callers cannot probe which emails exist.
    pub async fn login(&self, email: &str, secret: &str) -> AppResult<SessionGrant> {
        if email.trim().is_empty() || secret.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let Some(account) = self.store.authenticate(email, secret).await? else {
            warn!("Login rejected");
            return Err(AppError::unauthorized("Invalid credentials"));
        };

        let grant = self.grant(&account)?;
        info!(account_id = %account.id, "Login succeeded");
        Ok(grant)
    }

    /// Reloads the account behind `claims` and issues a fresh token with its
    /// current email and role. A deleted account is `Unauthorized`.
    pub async fn refresh(&self, claims: &Claims) -> AppResult<SessionGrant> {
        let account = match self.store.find(claims.account_id()).await {
            Ok(account) => account,
            Err(e) if e.kind == civichub_core::error::ErrorKind::NotFound => {
                return Err(AppError::unauthorized("Account no longer exists"));
            }
            Err(e) => return Err(e),
        };
        self.grant(&account)
    }

    /// Resolves the request token and verifies it.
    pub fn authorize(&self, header: Option<&str>, cookie: Option<&str>) -> AppResult<Claims> {
        let token = select_token(header, cookie)
            .ok_or_else(|| AppError::unauthorized("No token provided"))?;
        self.codec.verify(token)
    }

    fn grant(&self, account: &Account) -> AppResult<SessionGrant> {
        let issued = self.codec.issue(&TokenSubject::from(account))?;
        Ok(SessionGrant {
            user: account.view(),
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}
