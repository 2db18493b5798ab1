//! Start the CivicHub API server.

use std::sync::Arc;

use clap::Args;

use civichub_api::{AppState, run_server};
use civichub_core::config::AppConfig;
use civichub_core::error::AppError;
use civichub_database::PgAccountRepository;
use civichub_database::migration::run_migrations;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    let pool = super::connect(&config).await?;
    if !args.no_migrate {
        run_migrations(pool.pool()).await?;
    }

    let repo = Arc::new(PgAccountRepository::new(pool.pool().clone()));
    let state = AppState::new(config, repo)?;

    println!("Starting CivicHub server on {}", state.config.server.bind_address());
    let result = run_server(state).await;
    pool.close().await;
    result
}
