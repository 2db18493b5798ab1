//! Credential store over an [`AccountRepository`].

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;
use validator::ValidateEmail;

use civichub_core::config::AuthConfig;
use civichub_core::error::AppError;
use civichub_core::result::AppResult;
use civichub_database::repositories::AccountRepository;
use civichub_entity::account::{Account, AccountChanges, AccountRole, NewAccount};

use crate::password::{PasswordHasher, PasswordPolicy};

use super::secret::prepare_secret;

/// Input for [`CredentialStore::create`].
#[derive(Debug, Clone)]
pub struct NewCredential {
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Plaintext secret.
    pub secret: String,
    /// Role; `user` when omitted.
    pub role: Option<AccountRole>,
}

/// Input for [`CredentialStore::update`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CredentialChanges {
    /// New email address.
    pub email: Option<String>,
    /// New username.
    pub username: Option<String>,
    /// New plaintext secret; rehashed with a fresh salt.
    pub secret: Option<String>,
    /// New role.
    pub role: Option<AccountRole>,
}

/// Stores accounts with one-way hashed secrets.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    repo: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl CredentialStore {
    /// Creates a store over `repo` with the configured password policy.
    pub fn new(repo: Arc<dyn AccountRepository>, config: &AuthConfig) -> Self {
        Self {
            repo,
            hasher: PasswordHasher::new(),
            policy: PasswordPolicy::from_config(config),
        }
    }

    /// Creates an account. `Validation` for blank or malformed fields,
    /// `Conflict` when the email or username is taken.
    pub async fn create(&self, input: NewCredential) -> AppResult<Account> {
        let email = normalize_email(&input.email)?;
        let username = normalize_username(&input.username)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already in use"));
        }
        if self.repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("Username already in use"));
        }

        let secret = prepare_secret(&self.policy, &self.hasher, &input.secret)?;
        let account = self
            .repo
            .create(NewAccount {
                email,
                username,
                secret,
                role: input.role.unwrap_or_default(),
            })
            .await?;

        info!(account_id = %account.id, role = %account.role, "Account created");
        Ok(account)
    }

    /// Whether `candidate` is the secret of the account with `email`.
    /// Unknown emails verify as `false`.
    pub async fn verify(&self, email: &str, candidate: &str) -> AppResult<bool> {
        Ok(self.authenticate(email, candidate).await?.is_some())
    }

    /// Like [`verify`](Self::verify) but returns the matched account.
    pub async fn authenticate(&self, email: &str, candidate: &str) -> AppResult<Option<Account>> {
        let email = email.trim().to_lowercase();
        let Some(account) = self.repo.find_by_email(&email).await? else {
            debug!("Credential check for unknown email");
            return Ok(None);
        };

        if self.hasher.verify(candidate, &account.password_hash)? {
            Ok(Some(account))
        } else {
            debug!(account_id = %account.id, "Credential check failed");
            Ok(None)
        }
    }

    /// Applies a partial update. A present secret goes through the policy
    /// and is rehashed; absent fields keep their stored values.
    pub async fn update(&self, id: Uuid, input: CredentialChanges) -> AppResult<Account> {
        let mut changes = AccountChanges {
            role: input.role,
            ..Default::default()
        };

        if let Some(email) = input.email {
            let email = normalize_email(&email)?;
            if let Some(other) = self.repo.find_by_email(&email).await?
                && other.id != id
            {
                return Err(AppError::conflict("Email already in use"));
            }
            changes.email = Some(email);
        }
        if let Some(username) = input.username {
            let username = normalize_username(&username)?;
            if let Some(other) = self.repo.find_by_username(&username).await?
                && other.id != id
            {
                return Err(AppError::conflict("Username already in use"));
            }
            changes.username = Some(username);
        }
        if let Some(secret) = input.secret {
            changes.secret = Some(prepare_secret(&self.policy, &self.hasher, &secret)?);
        }

        let rehashed = changes.secret.is_some();
        let account = self.repo.update(id, changes).await?;
        info!(account_id = %id, rehashed, "Account updated");
        Ok(account)
    }

    /// Permanently deletes an account. `NotFound` when absent.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found(format!("Account {id} not found")));
        }
        info!(account_id = %id, "Account deleted");
        Ok(())
    }

    /// Loads an account. `NotFound` when absent.
    pub async fn find(&self, id: Uuid) -> AppResult<Account> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }

    /// Looks an account up by email (when `login` contains `@`) or username.
    pub async fn find_by_login(&self, login: &str) -> AppResult<Option<Account>> {
        let login = login.trim();
        if login.contains('@') {
            self.repo.find_by_email(&login.to_lowercase()).await
        } else {
            self.repo.find_by_username(login).await
        }
    }

    /// Creates an admin unless an account already holds the email or the
    /// username. Returns `None` when creation was skipped.
    pub async fn ensure_admin(&self, input: NewCredential) -> AppResult<Option<Account>> {
        let email = normalize_email(&input.email)?;
        let username = normalize_username(&input.username)?;

        if self.repo.find_by_email(&email).await?.is_some()
            || self.repo.find_by_username(&username).await?.is_some()
        {
            info!(%email, %username, "Admin already exists, skipping seed");
            return Ok(None);
        }

        self.create(NewCredential {
            role: Some(AccountRole::Admin),
            ..input
        })
        .await
        .map(Some)
    }

    /// Every account, newest first.
    pub async fn list(&self) -> AppResult<Vec<Account>> {
        self.repo.list().await
    }

    /// Number of stored accounts.
    pub async fn count(&self) -> AppResult<u64> {
        self.repo.count().await
    }
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    if !email.validate_email() {
        return Err(AppError::validation(format!("'{email}' is not a valid email")));
    }
    Ok(email)
}

fn normalize_username(username: &str) -> AppResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    Ok(username.to_string())
}
