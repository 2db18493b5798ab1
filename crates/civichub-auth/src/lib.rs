//! # civichub-auth
//!
//! Authentication for CivicHub.
//!
//! ## Modules
//!
//! - `jwt`: signed session token issuing and verification
//! - `password`: Argon2id hashing and the length policy
//! - `credential`: the account credential store
//! - `session`: login, refresh and request authorization

pub mod credential;
pub mod jwt;
pub mod password;
pub mod session;

pub use credential::{CredentialChanges, CredentialStore, NewCredential, prepare_secret};
pub use jwt::{Claims, IssuedToken, TokenCodec, TokenError, TokenSubject};
pub use password::{PasswordHasher, PasswordPolicy};
pub use session::{SessionGrant, SessionService, select_token};
