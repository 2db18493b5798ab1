//! Application state shared across all handlers and extractors.

use std::sync::Arc;
use std::time::Instant;

use civichub_auth::{CredentialStore, SessionService, TokenCodec};
use civichub_core::config::AppConfig;
use civichub_core::result::AppResult;
use civichub_database::repositories::AccountRepository;

/// Shared dependencies handed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Login, refresh, and token verification.
    pub sessions: Arc<SessionService>,
    /// Process start, for the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    /// Wires the session service over `repo`.
    ///
    /// Fails when no signing secret is configured, so a server can never
    /// start without one.
    pub fn new(config: AppConfig, repo: Arc<dyn AccountRepository>) -> AppResult<Self> {
        let codec = TokenCodec::from_config(&config.auth)?;
        let store = CredentialStore::new(repo, &config.auth);
        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionService::new(store, codec)),
            started_at: Instant::now(),
        })
    }

    /// The credential store.
    pub fn credentials(&self) -> &CredentialStore {
        self.sessions.store()
    }
}
