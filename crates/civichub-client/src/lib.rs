//! # civichub-client
//!
//! Client-side building blocks for the CivicHub admin console:
//!
//! - [`session::SessionCache`]: the signed-in identity, persisted across
//!   restarts and revalidated against the server on startup.
//! - [`staging::StagingPipeline`]: local media selection, downscaling, and
//!   preview references ahead of an upload.
//! - [`notify::Notifier`]: transient toasts surfaced to the user.
//!
//! Every component takes its collaborators explicitly; there is no global
//! state.

pub mod api;
pub mod notify;
mod pending;
pub mod session;
pub mod staging;
pub mod storage;

pub use api::{HttpSessionApi, LoginCredentials, LoginPayload, SessionApi};
pub use notify::{Notifier, Toast, ToastKind};
pub use session::{SessionCache, SessionRecord, SessionSnapshot};
pub use staging::{
    Downscaler, MemoryReferenceRegistry, PreviewHandle, ReferenceRegistry, StagedFile,
    StagingPipeline, Submission, UploadForm, UploadSink,
};
pub use storage::{CredentialSlot, FileStore, MemoryStore, RecordStore};
