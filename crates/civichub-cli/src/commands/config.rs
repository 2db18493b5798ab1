//! Configuration inspection commands.

use clap::{Args, Subcommand};

use civichub_core::config::AppConfig;
use civichub_core::error::AppError;
use civichub_database::connection::redact_url;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets omitted)
    Show,
    /// Check that the configuration can run a server
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => {
                let mut shown = config.clone();
                shown.database.url = redact_url(&shown.database.url);
                output::print_json(&shown);
            }
            OutputFormat::Table => {
                output::print_kv("Server", &config.server.bind_address());
                output::print_kv("Database", &redact_url(&config.database.url));
                output::print_kv(
                    "CORS origins",
                    &config.server.cors.allowed_origins.join(", "),
                );
                output::print_kv(
                    "Token TTL",
                    &format!("{} minutes", config.auth.token_ttl_minutes),
                );
                output::print_kv("Cookie", &config.auth.cookie.name);
                output::print_kv("Log level", &config.logging.level);
            }
        },
        ConfigCommand::Validate => {
            if let Err(e) = config.auth.signing_secret() {
                output::print_error(&format!("Configuration invalid: {}", e.message));
                return Err(e);
            }
            if config.auth.token_ttl_minutes == 0 {
                let e = AppError::configuration("auth.token_ttl_minutes must be positive");
                output::print_error(&format!("Configuration invalid: {}", e.message));
                return Err(e);
            }
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Server", &config.server.bind_address());
            output::print_kv("Database", &redact_url(&config.database.url));
        }
    }

    Ok(())
}
