//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! layered TOML files and `CIVICHUB_`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod client;
pub mod database;
pub mod logging;
pub mod seed;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, CookieConfig};
pub use self::client::{ClientConfig, StagingConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::seed::SeedConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "CIVICHUB";

/// Root application configuration.
///
/// Top-level deserialization target for `config/default.toml`, the
/// environment overlay, and `CIVICHUB_*` variables (e.g.
/// `CIVICHUB_AUTH__JWT_SECRET`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Initial administrator provisioning.
    #[serde(default)]
    pub seed: SeedConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Settings for client applications built on `civichub-client`.
    #[serde(default)]
    pub client: ClientConfig,
}

impl AppConfig {
    /// Load configuration using `config/default` as the base file.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration from an explicit base file.
    ///
    /// Merges the base file with `config/{env}` and environment variables
    /// prefixed with `CIVICHUB_`. Missing files are skipped.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        tracing::debug!(base, env, "Loading configuration");
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
