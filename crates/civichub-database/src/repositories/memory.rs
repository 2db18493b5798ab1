//! In-memory account repository for tests and single-process demos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use civichub_core::error::AppError;
use civichub_core::result::AppResult;
use civichub_entity::account::{Account, AccountChanges, NewAccount};

use super::AccountRepository;

/// Account repository held in process memory.
///
/// A single mutex guards the map so the uniqueness checks and the write
/// happen atomically.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountRepository {
    accounts: Arc<Mutex<HashMap<Uuid, Account>>>,
}

impl MemoryAccountRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique(
    accounts: &HashMap<Uuid, Account>,
    skip: Option<Uuid>,
    email: Option<&str>,
    username: Option<&str>,
) -> AppResult<()> {
    for account in accounts.values().filter(|a| Some(a.id) != skip) {
        if email == Some(account.email.as_str()) {
            return Err(AppError::conflict("Email already in use"));
        }
        if username == Some(account.username.as_str()) {
            return Err(AppError::conflict("Username already in use"));
        }
    }
    Ok(())
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.lock().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let mut all: Vec<Account> = self.accounts.lock().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn create(&self, data: NewAccount) -> AppResult<Account> {
        let mut accounts = self.accounts.lock().await;
        ensure_unique(
            &accounts,
            None,
            Some(&data.email),
            Some(&data.username),
        )?;

        let now = Utc::now();
        let account = Account {
            id: Uuid::now_v7(),
            email: data.email,
            username: data.username,
            password_hash: data.secret.into_inner(),
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        debug!(account_id = %account.id, "Account stored in memory");
        Ok(account)
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> AppResult<Account> {
        let mut accounts = self.accounts.lock().await;
        if !accounts.contains_key(&id) {
            return Err(AppError::not_found(format!("Account {id} not found")));
        }
        ensure_unique(
            &accounts,
            Some(id),
            changes.email.as_deref(),
            changes.username.as_deref(),
        )?;

        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))?;
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(username) = changes.username {
            account.username = username;
        }
        if let Some(secret) = changes.secret {
            account.password_hash = secret.into_inner();
        }
        if let Some(role) = changes.role {
            account.role = role;
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.accounts.lock().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.accounts.lock().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civichub_core::error::ErrorKind;
    use civichub_entity::account::{AccountRole, PreparedSecret};

    const PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$YWJjZGVmZ2hpamtsbW5vcA$MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY";

    fn new_account(email: &str, username: &str) -> NewAccount {
        NewAccount {
            email: email.into(),
            username: username.into(),
            secret: PreparedSecret::from_phc(PHC).unwrap(),
            role: AccountRole::Admin,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryAccountRepository::new();
        let created = repo.create(new_account("a@x.org", "a")).await.unwrap();
        let found = repo.find_by_email("a@x.org").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, PHC);
        assert!(repo.find_by_username("a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = MemoryAccountRepository::new();
        repo.create(new_account("a@x.org", "a")).await.unwrap();
        let err = repo.create(new_account("a@x.org", "b")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_checks_uniqueness_against_others() {
        let repo = MemoryAccountRepository::new();
        let a = repo.create(new_account("a@x.org", "a")).await.unwrap();
        repo.create(new_account("b@x.org", "b")).await.unwrap();

        // Keeping your own email is fine.
        let same = AccountChanges {
            email: Some("a@x.org".into()),
            ..Default::default()
        };
        assert!(repo.update(a.id, same).await.is_ok());

        let taken = AccountChanges {
            username: Some("b".into()),
            ..Default::default()
        };
        let err = repo.update(a.id, taken).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MemoryAccountRepository::new();
        let err = repo
            .update(Uuid::new_v4(), AccountChanges::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let repo = MemoryAccountRepository::new();
        let a = repo.create(new_account("a@x.org", "a")).await.unwrap();
        assert!(repo.delete(a.id).await.unwrap());
        assert!(!repo.delete(a.id).await.unwrap());
        assert!(repo.find_by_id(a.id).await.unwrap().is_none());
    }
}
