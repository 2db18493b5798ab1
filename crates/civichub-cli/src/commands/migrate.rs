//! Database migration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use civichub_core::config::AppConfig;
use civichub_core::error::AppError;
use civichub_database::migration::{migration_status, run_migrations};

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show migration status
    Status,
}

#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    #[tabled(rename = "Version")]
    version: i64,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Applied")]
    applied: bool,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::connect(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let rows: Vec<StatusRow> = migration_status(pool.pool())
                .await?
                .into_iter()
                .map(|m| StatusRow {
                    version: m.version,
                    description: m.description,
                    applied: m.applied,
                })
                .collect();
            let pending = rows.iter().filter(|r| !r.applied).count();
            output::print_list(&rows, format);
            if pending > 0 && format == OutputFormat::Table {
                output::print_warning(&format!("{pending} migration(s) pending"));
            }
        }
    }

    pool.close().await;
    Ok(())
}
