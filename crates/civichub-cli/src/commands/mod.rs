//! CLI command definitions and dispatch.

pub mod account;
pub mod config;
pub mod migrate;
pub mod seed;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use civichub_auth::CredentialStore;
use civichub_core::config::AppConfig;
use civichub_core::error::AppError;
use civichub_database::{DatabasePool, PgAccountRepository};

use crate::output::OutputFormat;

/// CivicHub administration
#[derive(Debug, Parser)]
#[command(name = "civichub", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}`
    #[arg(short, long, env = "CIVICHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Create the initial administrator
    Seed(seed::SeedArgs),
    /// Account management
    Account(account::AccountArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let settings = AppConfig::load_from(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, settings).await,
            Commands::Migrate(args) => migrate::execute(args, &settings, self.format).await,
            Commands::Seed(args) => seed::execute(args, &settings).await,
            Commands::Account(args) => account::execute(args, &settings, self.format).await,
            Commands::Config(args) => config::execute(args, &settings, &self.config, self.format),
        }
    }
}

/// Helper: open the database pool
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: credential store backed by Postgres
pub fn credential_store(config: &AppConfig, pool: &DatabasePool) -> CredentialStore {
    let repo = Arc::new(PgAccountRepository::new(pool.pool().clone()));
    CredentialStore::new(repo, &config.auth)
}

/// Helper: take `value` or prompt for it
pub fn prompt_text(value: Option<&String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Helper: take `value` or prompt for a confirmed password
pub fn prompt_password(value: Option<&String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Password::new()
            .with_prompt(prompt)
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}
