//! Media staging ahead of an upload.
//!
//! Files picked by the user are downscaled, given a preview reference, and
//! held until the form is submitted or the pipeline is torn down. Every
//! reference created here is released exactly once.

pub mod compress;
pub mod form;
pub mod pipeline;
pub mod reference;

use bytes::Bytes;
use serde::Serialize;

pub use self::compress::Downscaler;
pub use self::form::{HttpUploadSink, Submission, UploadForm, UploadSink};
pub use self::pipeline::StagingPipeline;
pub use self::reference::{MemoryReferenceRegistry, ReferenceRegistry};

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Original file name.
    pub name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// File contents.
    pub bytes: Bytes,
}

impl StagedFile {
    /// Create a staged file.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Whether the MIME type is an image type.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no contents.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A staged file together with its preview reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewHandle {
    /// Stable identifier used by [`StagingPipeline::remove`].
    pub id: String,
    /// Preview reference handed to the renderer.
    pub url: String,
    /// The (possibly downscaled) file.
    #[serde(skip)]
    pub file: StagedFile,
}
