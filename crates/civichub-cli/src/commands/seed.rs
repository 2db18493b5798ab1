//! Create the initial administrator.

use clap::Args;

use civichub_auth::NewCredential;
use civichub_core::config::AppConfig;
use civichub_core::error::AppError;

use crate::output;

/// Arguments for the seed command. Values fall back to the `[seed]`
/// config section, then to an interactive prompt.
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Admin username
    #[arg(short, long)]
    pub username: Option<String>,
    /// Admin email
    #[arg(short, long)]
    pub email: Option<String>,
    /// Admin password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Execute the seed command
pub async fn execute(args: &SeedArgs, config: &AppConfig) -> Result<(), AppError> {
    let seed = &config.seed;
    let username = super::prompt_text(
        args.username.as_ref().or(seed.admin_username.as_ref()),
        "Admin username",
    )?;
    let email = super::prompt_text(
        args.email.as_ref().or(seed.admin_email.as_ref()),
        "Admin email",
    )?;
    let password = super::prompt_password(
        args.password.as_ref().or(seed.admin_password.as_ref()),
        "Admin password",
    )?;

    let pool = super::connect(config).await?;
    let store = super::credential_store(config, &pool);

    let created = store
        .ensure_admin(NewCredential {
            email,
            username,
            secret: password,
            role: None,
        })
        .await?;

    match created {
        Some(admin) => output::print_success(&format!(
            "Admin '{}' created ({}, id: {})",
            admin.username, admin.email, admin.id
        )),
        None => output::print_warning("Admin user already exists. Skipping creation."),
    }

    pool.close().await;
    Ok(())
}
