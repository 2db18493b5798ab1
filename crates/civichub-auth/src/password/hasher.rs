//! Argon2id hashing with a fresh random salt per hash.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use civichub_core::error::AppError;
use civichub_entity::account::PreparedSecret;

/// One-way secret hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a hasher with Argon2id default parameters.
    pub fn new() -> Self {
        Self
    }

    /// Hashes `secret`. Two calls with the same input yield different
    /// hashes because each draws its own salt.
    pub fn hash(&self, secret: &str) -> Result<PreparedSecret, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Secret hashing failed: {e}")))?
            .to_string();
        PreparedSecret::from_phc(phc)
    }

    /// Checks `candidate` against a stored PHC hash.
    pub fn verify(&self, candidate: &str, stored: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| AppError::internal(format!("Stored hash is not a PHC string: {e}")))?;

        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!("Secret verification failed: {e}"))),
        }
    }
}
