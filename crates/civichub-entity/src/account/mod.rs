//! Account domain entities.

pub mod model;
pub mod role;
pub mod secret;

pub use model::{Account, AccountChanges, AccountView, NewAccount};
pub use role::AccountRole;
pub use secret::PreparedSecret;
