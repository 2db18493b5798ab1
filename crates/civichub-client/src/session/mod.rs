//! Client session cache.

pub mod cache;
pub mod record;

pub use cache::{SessionCache, SessionSnapshot};
pub use record::SessionRecord;
