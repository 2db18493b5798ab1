//! Account management commands.

use clap::{Args, Subcommand};
use uuid::Uuid;

use civichub_auth::{CredentialChanges, CredentialStore, NewCredential};
use civichub_core::config::AppConfig;
use civichub_core::error::AppError;
use civichub_entity::account::{Account, AccountRole};

use crate::output::{self, AccountRow, OutputFormat};

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account subcommand
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// List every account
    List,
    /// Show one account
    Show {
        /// Account id, email, or username
        account: String,
    },
    /// Create an account
    Create {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Role
        #[arg(short, long, default_value = "admin")]
        role: AccountRole,
    },
    /// Change an account's role
    SetRole {
        /// Account id, email, or username
        account: String,
        /// New role
        role: AccountRole,
    },
    /// Reset an account's password
    ResetPassword {
        /// Account id, email, or username
        account: String,
        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Permanently delete an account
    Delete {
        /// Account id, email, or username
        account: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Execute account commands
pub async fn execute(
    args: &AccountArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::connect(config).await?;
    let store = super::credential_store(config, &pool);
    let result = run(&args.command, &store, format).await;
    pool.close().await;
    result
}

async fn run(
    command: &AccountCommand,
    store: &CredentialStore,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        AccountCommand::List => {
            let rows: Vec<AccountRow> = store.list().await?.iter().map(AccountRow::from).collect();
            output::print_list(&rows, format);
        }
        AccountCommand::Show { account } => {
            let account = resolve(store, account).await?;
            output::print_account(&account, format);
        }
        AccountCommand::Create {
            username,
            email,
            password,
            role,
        } => {
            let username = super::prompt_text(username.as_ref(), "Username")?;
            let email = super::prompt_text(email.as_ref(), "Email")?;
            let password = super::prompt_password(password.as_ref(), "Password")?;

            let account = store
                .create(NewCredential {
                    email,
                    username,
                    secret: password,
                    role: Some(*role),
                })
                .await?;
            output::print_success(&format!(
                "Account '{}' created (role: {}, id: {})",
                account.username, account.role, account.id
            ));
        }
        AccountCommand::SetRole { account, role } => {
            let account = resolve(store, account).await?;
            let updated = store
                .update(
                    account.id,
                    CredentialChanges {
                        role: Some(*role),
                        ..Default::default()
                    },
                )
                .await?;
            output::print_success(&format!(
                "Account '{}' is now {}",
                updated.username, updated.role
            ));
        }
        AccountCommand::ResetPassword { account, password } => {
            let account = resolve(store, account).await?;
            let password = super::prompt_password(password.as_ref(), "New password")?;
            store
                .update(
                    account.id,
                    CredentialChanges {
                        secret: Some(password),
                        ..Default::default()
                    },
                )
                .await?;
            output::print_success(&format!("Password reset for '{}'", account.username));
        }
        AccountCommand::Delete { account, force } => {
            let account = resolve(store, account).await?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Permanently delete '{}' ({})?",
                        account.username, account.email
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            store.delete(account.id).await?;
            output::print_success(&format!("Account '{}' deleted", account.username));
        }
    }

    Ok(())
}

/// Find an account by id, email, or username.
async fn resolve(store: &CredentialStore, key: &str) -> Result<Account, AppError> {
    if let Ok(id) = Uuid::parse_str(key.trim()) {
        return store.find(id).await;
    }
    store
        .find_by_login(key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Account '{key}' not found")))
}
