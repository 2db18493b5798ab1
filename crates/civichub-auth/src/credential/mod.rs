//! Account credentials: creation, verification, and mutation.

pub mod secret;
pub mod store;

pub use secret::prepare_secret;
pub use store::{CredentialChanges, CredentialStore, NewCredential};
