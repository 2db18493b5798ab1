//! Selection, preview, and submission of staged media.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use civichub_core::config::StagingConfig;
use civichub_core::error::AppError;
use civichub_core::result::AppResult;

use super::compress::Downscaler;
use super::form::{Submission, UploadForm, UploadSink};
use super::reference::ReferenceRegistry;
use super::{PreviewHandle, StagedFile};
use crate::notify::Notifier;
use crate::pending::PendingGuard;

#[derive(Debug, Default)]
struct StagingState {
    previews: Vec<PreviewHandle>,
    staged: Option<String>,
    torn_down: bool,
}

impl StagingState {
    fn release_all(&mut self, registry: &dyn ReferenceRegistry) -> usize {
        let released = self.previews.len();
        for preview in self.previews.drain(..) {
            registry.release(&preview.url);
        }
        self.staged = None;
        released
    }
}

/// Holds the user's media selection between picking files and submitting.
///
/// Every preview reference is released exactly once: on removal, on
/// supersession by a new single selection, after a successful submit, on
/// [`teardown`](Self::teardown), or when the pipeline is dropped.
///
/// References are only created once a whole selection has been processed,
/// under the same lock that records them, so a cancelled `select` leaves
/// nothing behind.
#[derive(Debug)]
pub struct StagingPipeline {
    downscaler: Downscaler,
    registry: Arc<dyn ReferenceRegistry>,
    notifier: Notifier,
    single_selection: bool,
    media_required: bool,
    max_files: usize,
    state: Mutex<StagingState>,
    submitting: AtomicBool,
}

impl StagingPipeline {
    /// Create a pipeline from staging settings.
    pub fn new(
        config: &StagingConfig,
        registry: Arc<dyn ReferenceRegistry>,
        notifier: Notifier,
    ) -> Self {
        Self {
            downscaler: Downscaler::from_config(config),
            registry,
            notifier,
            single_selection: config.single_selection,
            media_required: config.media_required,
            max_files: config.max_files.max(1),
            state: Mutex::new(StagingState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StagingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_capacity(&self, active: usize, incoming: usize) -> AppResult<()> {
        if self.single_selection || active + incoming <= self.max_files {
            return Ok(());
        }
        let message = format!("You can only upload up to {} images.", self.max_files);
        self.notifier.error(message.clone());
        Err(AppError::validation(message))
    }

    /// Stage newly picked files and return their previews.
    ///
    /// In single-selection mode only the first file is taken and it replaces
    /// the previous selection. Otherwise files are appended up to the
    /// configured maximum. Fails once the pipeline has been torn down.
    pub async fn select(&self, files: Vec<StagedFile>) -> AppResult<Vec<PreviewHandle>> {
        let files: Vec<StagedFile> = if self.single_selection {
            files.into_iter().take(1).collect()
        } else {
            files
        };
        if files.is_empty() {
            return Ok(Vec::new());
        }
        {
            let state = self.lock();
            if state.torn_down {
                return Err(torn_down());
            }
            self.check_capacity(state.previews.len(), files.len())?;
        }

        let mut processed = Vec::with_capacity(files.len());
        for file in files {
            let file = match self.downscaler.downscale(file.clone()).await {
                Ok(processed) => processed,
                Err(e) => {
                    tracing::warn!(name = %file.name, error = %e, "Image compression failed");
                    self.notifier.warning("Image compression failed, using original file");
                    file
                }
            };
            processed.push(file);
        }

        let mut state = self.lock();
        if state.torn_down {
            tracing::debug!(dropped = processed.len(), "Selection finished after teardown");
            return Err(torn_down());
        }
        // Another selection may have landed while this one was processing.
        self.check_capacity(state.previews.len(), processed.len())?;

        let handles: Vec<PreviewHandle> = processed
            .into_iter()
            .map(|file| PreviewHandle {
                id: Uuid::new_v4().to_string(),
                url: self.registry.create(&file),
                file,
            })
            .collect();
        if self.single_selection {
            let superseded = state.release_all(self.registry.as_ref());
            if superseded > 0 {
                tracing::debug!(superseded, "Previous selection released");
            }
        }
        if state.staged.is_none() {
            state.staged = handles.first().map(|h| h.id.clone());
        }
        state.previews.extend(handles.iter().cloned());
        tracing::debug!(added = handles.len(), active = state.previews.len(), "Files staged");

        Ok(handles)
    }

    /// Drop a preview. Unknown or already removed ids are ignored; returns
    /// whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.lock();
        let Some(index) = state.previews.iter().position(|p| p.id == id) else {
            return false;
        };
        let preview = state.previews.remove(index);
        self.registry.release(&preview.url);
        if state.staged.as_deref() == Some(id) {
            state.staged = None;
        }
        true
    }

    /// Active previews in selection order.
    pub fn previews(&self) -> Vec<PreviewHandle> {
        self.lock().previews.clone()
    }

    /// The file that will be submitted in single-selection mode.
    pub fn staged(&self) -> Option<StagedFile> {
        let state = self.lock();
        let id = state.staged.as_deref()?;
        state
            .previews
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.file.clone())
    }

    /// Whether a submit is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    fn media(&self) -> Vec<StagedFile> {
        if self.single_selection {
            self.staged().into_iter().collect()
        } else {
            self.lock().previews.iter().map(|p| p.file.clone()).collect()
        }
    }

    /// Validate the form, hand it to `sink`, and reset on success.
    ///
    /// On failure the previews are kept so the user can retry.
    pub async fn submit(&self, form: &mut UploadForm, sink: &dyn UploadSink) -> AppResult<()> {
        let Some(_guard) = PendingGuard::acquire(&self.submitting) else {
            return Err(AppError::conflict("A submission is already in progress"));
        };

        let name = form.name.trim().to_string();
        let media = self.media();
        if name.is_empty() || (self.media_required && media.is_empty()) {
            let message = "Please provide both a name and an image";
            self.notifier.error(message);
            return Err(AppError::validation(message));
        }

        let submission = Submission {
            name,
            fields: form.fields.clone(),
            media,
        };

        match sink.send(submission).await {
            Ok(()) => {
                let released = self.lock().release_all(self.registry.as_ref());
                form.clear();
                tracing::info!(released, "Submission accepted");
                self.notifier.success("Submitted successfully!");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Submission failed");
                let message = if err.is_client_error() {
                    err.message.clone()
                } else {
                    "Upload failed. Please try again.".to_string()
                };
                self.notifier.error(message);
                Err(err)
            }
        }
    }

    /// Release every active reference and refuse further selections. Safe
    /// to call more than once.
    pub fn teardown(&self) {
        let mut state = self.lock();
        state.torn_down = true;
        let released = state.release_all(self.registry.as_ref());
        if released > 0 {
            tracing::debug!(released, "Staging pipeline torn down");
        }
    }
}

fn torn_down() -> AppError {
    AppError::conflict("The staging pipeline has been torn down")
}

impl Drop for StagingPipeline {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.release_all(self.registry.as_ref());
    }
}
