//! CivicHub Server
//!
//! Main entry point that wires the crates together and starts the API.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use civichub_api::{AppState, run_server};
use civichub_auth::NewCredential;
use civichub_core::config::AppConfig;
use civichub_core::error::AppError;
use civichub_database::migration::run_migrations;
use civichub_database::{DatabasePool, PgAccountRepository};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let base = std::env::var("CIVICHUB_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("CIVICHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CivicHub v{}", env!("CARGO_PKG_VERSION"));

    // Refuse to start without a signing secret, before touching the database.
    config.auth.signing_secret()?;

    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;

    let repo = Arc::new(PgAccountRepository::new(pool.pool().clone()));
    let state = AppState::new(config, repo)?;

    seed_admin(&state).await?;

    let result = run_server(state).await;
    pool.close().await;
    result
}

/// Create the configured administrator when the `[seed]` section is complete.
async fn seed_admin(state: &AppState) -> Result<(), AppError> {
    let seed = &state.config.seed;
    let (Some(username), Some(email), Some(password)) = (
        seed.admin_username.clone(),
        seed.admin_email.clone(),
        seed.admin_password.clone(),
    ) else {
        tracing::debug!("No complete seed configuration, skipping admin seed");
        return Ok(());
    };

    let created = state
        .credentials()
        .ensure_admin(NewCredential {
            email,
            username,
            secret: password,
            role: None,
        })
        .await?;
    if let Some(admin) = created {
        tracing::info!(account_id = %admin.id, username = %admin.username, "Seeded admin account");
    }
    Ok(())
}
