//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). Required.
    #[serde(default, skip_serializing)]
    pub jwt_secret: Option<String>,
    /// Session token TTL in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Minimum password length for new secrets.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Session cookie settings.
    #[serde(default)]
    pub cookie: CookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_minutes: default_token_ttl(),
            password_min_length: default_password_min(),
            cookie: CookieConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Returns the configured signing secret, or a configuration error
    /// when it is missing or blank.
    pub fn signing_secret(&self) -> Result<&str, AppError> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(secret),
            _ => Err(AppError::configuration(
                "auth.jwt_secret is not set (CIVICHUB_AUTH__JWT_SECRET)",
            )),
        }
    }
}

/// HTTP-only session cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Whether the cookie requires HTTPS.
    #[serde(default)]
    pub secure: bool,
    /// Cookie lifetime in hours.
    #[serde(default = "default_cookie_max_age")]
    pub max_age_hours: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: false,
            max_age_hours: default_cookie_max_age(),
        }
    }
}

fn default_token_ttl() -> u64 {
    60
}

fn default_password_min() -> usize {
    8
}

fn default_cookie_name() -> String {
    "jwt".to_string()
}

fn default_cookie_max_age() -> i64 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let config = AuthConfig::default();
        let err = config.signing_secret().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        let config = AuthConfig {
            jwt_secret: Some("   ".into()),
            ..Default::default()
        };
        assert!(config.signing_secret().is_err());
    }

    #[test]
    fn test_secret_is_returned() {
        let config = AuthConfig {
            jwt_secret: Some("s3cret".into()),
            ..Default::default()
        };
        assert_eq!(config.signing_secret().unwrap(), "s3cret");
    }
}
