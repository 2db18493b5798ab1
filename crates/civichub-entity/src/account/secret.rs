//! Hashed secret newtype.

use std::fmt;

use argon2::PasswordHash;
use civichub_core::AppError;

/// A secret that has already been through the password hasher.
///
/// Can only be built from a well-formed PHC hash string, so a plaintext
/// secret cannot reach the storage layer.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedSecret(String);

impl PreparedSecret {
    /// Wrap a PHC-formatted hash. Rejects anything that does not parse.
    pub fn from_phc(hash: impl Into<String>) -> Result<Self, AppError> {
        let hash = hash.into();
        PasswordHash::new(&hash)
            .map_err(|_| AppError::internal("Refusing to store a secret that is not hashed"))?;
        Ok(Self(hash))
    }

    /// The PHC hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the PHC hash string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for PreparedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PreparedSecret(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$YWJjZGVmZ2hpamtsbW5vcA$MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY";

    #[test]
    fn test_accepts_phc_string() {
        let secret = PreparedSecret::from_phc(PHC).unwrap();
        assert_eq!(secret.as_str(), PHC);
    }

    #[test]
    fn test_rejects_plaintext() {
        assert!(PreparedSecret::from_phc("hunter22").is_err());
        assert!(PreparedSecret::from_phc("").is_err());
    }

    #[test]
    fn test_debug_redacts() {
        let secret = PreparedSecret::from_phc(PHC).unwrap();
        assert_eq!(format!("{secret:?}"), "PreparedSecret(..)");
    }
}
