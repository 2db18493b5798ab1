//! Policy applied to every new or changed secret.

use civichub_core::config::AuthConfig;
use civichub_core::error::AppError;

/// Minimum-length secret policy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl PasswordPolicy {
    /// Creates a policy requiring at least `min_length` characters.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Creates a policy from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.password_min_length)
    }

    /// Rejects blank secrets and secrets shorter than the minimum.
    pub fn validate(&self, secret: &str) -> Result<(), AppError> {
        if secret.trim().is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if secret.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length_counts_chars() {
        let policy = PasswordPolicy::new(4);
        assert!(policy.validate("abc").is_err());
        assert!(policy.validate("abcd").is_ok());
        assert!(policy.validate("ééé").is_err());
    }

    #[test]
    fn test_blank_is_rejected() {
        let policy = PasswordPolicy::new(1);
        assert!(policy.validate("   ").is_err());
        assert!(policy.validate("").is_err());
    }
}
