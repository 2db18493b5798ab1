//! Session lifecycle shared by the server and the client cache.

pub mod state;

pub use state::{SessionEvent, SessionPhase};
