//! The single path from a plaintext secret to a storable hash.

use civichub_core::error::AppError;
use civichub_entity::account::PreparedSecret;

use crate::password::{PasswordHasher, PasswordPolicy};

/// Enforce the policy on `plain`, then hash it.
///
/// Used by both account creation and secret changes, so every stored hash
/// went through exactly one hashing step.
pub fn prepare_secret(
    policy: &PasswordPolicy,
    hasher: &PasswordHasher,
    plain: &str,
) -> Result<PreparedSecret, AppError> {
    policy.validate(plain)?;
    hasher.hash(plain)
}
