//! The signed-in identity held by the client.
//!
//! Lifecycle: construct, [`SessionCache::rehydrate`] once at startup, then
//! mutate through [`SessionCache::sign_in`], [`SessionCache::logout`] and
//! [`SessionCache::clear`]. Every mutation drives the shared
//! [`SessionPhase`] machine.
//!
//! Server responses are tagged with a monotonic sequence number taken when
//! the request started. Logout and clear bump the sequence, so a response
//! that lands after the user has moved on is dropped instead of reviving a
//! session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use civichub_core::config::ClientConfig;
use civichub_core::error::AppError;
use civichub_core::result::AppResult;
use civichub_entity::account::AccountView;
use civichub_entity::session::{SessionEvent, SessionPhase};

use crate::api::{LoginCredentials, LoginPayload, SessionApi};
use crate::notify::Notifier;
use crate::pending::PendingGuard;
use crate::storage::{CredentialSlot, RecordStore};

use super::record::SessionRecord;

/// Point-in-time view of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Current identity.
    pub user: Option<AccountView>,
    /// Whether the identity has been confirmed by the server.
    pub is_authenticated: bool,
    /// Whether the confirmed identity is an admin.
    pub is_admin: bool,
    /// Whether startup rehydration has finished.
    pub hydrated: bool,
    /// Lifecycle phase.
    pub phase: SessionPhase,
}

/// Outcome of applying a server payload.
#[derive(Debug)]
enum Applied {
    Session(AccountView),
    Incomplete,
    Superseded,
}

#[derive(Debug, Default)]
struct CacheState {
    user: Option<AccountView>,
    phase: SessionPhase,
}

/// Client-side session state with persistence and revalidation.
pub struct SessionCache {
    api: Arc<dyn SessionApi>,
    records: Arc<dyn RecordStore>,
    slots: Arc<dyn CredentialSlot>,
    notifier: Notifier,
    record_name: String,
    token_slot: String,
    state: RwLock<CacheState>,
    pending: AtomicBool,
    sequence: AtomicU64,
    rehydrate_started: AtomicBool,
    hydrated: AtomicBool,
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("record_name", &self.record_name)
            .field("token_slot", &self.token_slot)
            .field("pending", &self.pending)
            .field("sequence", &self.sequence)
            .field("hydrated", &self.hydrated)
            .finish_non_exhaustive()
    }
}

impl SessionCache {
    /// Create a cache. Nothing is read from storage until
    /// [`rehydrate`](Self::rehydrate).
    pub fn new(
        config: &ClientConfig,
        api: Arc<dyn SessionApi>,
        records: Arc<dyn RecordStore>,
        slots: Arc<dyn CredentialSlot>,
        notifier: Notifier,
    ) -> Self {
        Self {
            api,
            records,
            slots,
            notifier,
            record_name: config.record_name.clone(),
            token_slot: config.token_slot.clone(),
            state: RwLock::new(CacheState::default()),
            pending: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
            rehydrate_started: AtomicBool::new(false),
            hydrated: AtomicBool::new(false),
        }
    }

    /// Apply a server login response.
    ///
    /// An incomplete payload is logged and ignored; returns whether the
    /// session was updated.
    pub async fn login(&self, payload: LoginPayload) -> AppResult<bool> {
        Ok(matches!(self.apply(payload, None).await?, Applied::Session(_)))
    }

    /// Submit credentials to the server and apply the response.
    pub async fn sign_in(&self, credentials: LoginCredentials) -> AppResult<AccountView> {
        let Some(_guard) = PendingGuard::acquire(&self.pending) else {
            return Err(AppError::conflict("A sign-in is already in progress"));
        };
        let seq = self.next_sequence();

        {
            let mut state = self.state.write().await;
            state.phase = state.phase.transition(SessionEvent::Login)?;
        }

        let outcome = self.api.login(&credentials).await;
        if self.is_stale(seq) {
            tracing::debug!(seq, "Discarding superseded sign-in response");
            return Err(AppError::conflict("Sign-in was superseded"));
        }

        let err = match outcome {
            Ok(payload) => match self.apply(payload, Some(seq)).await {
                Ok(Applied::Session(user)) => return Ok(user),
                Ok(Applied::Superseded) => {
                    return Err(AppError::conflict("Sign-in was superseded"));
                }
                Ok(Applied::Incomplete) => {
                    AppError::upstream("The server returned an incomplete session")
                }
                Err(err) => err,
            },
            Err(err) => err,
        };

        self.reject().await;
        let message = if err.is_client_error() {
            err.message.clone()
        } else {
            "Login failed. Please try again.".to_string()
        };
        self.notifier.error(message);
        tracing::warn!(error = %err, "Sign-in failed");
        Err(err)
    }

    /// Sign out locally, purge the persisted record, then tell the server.
    pub async fn logout(&self) -> AppResult<()> {
        self.next_sequence();
        let token = {
            let mut state = self.state.write().await;
            state.user = None;
            state.phase = state.phase.transition(SessionEvent::Logout)?;

            let token = self.slots.get(&self.token_slot).await?;
            self.slots.remove(&self.token_slot).await?;
            self.records.purge(&self.record_name).await?;
            token
        };
        tracing::info!("Signed out");

        if let Err(e) = self.api.logout(token.as_deref()).await {
            tracing::warn!(error = %e, "Server logout failed");
        }
        Ok(())
    }

    /// Reset to anonymous and persist the blank record.
    pub async fn clear(&self) -> AppResult<()> {
        self.next_sequence();
        let mut state = self.state.write().await;
        state.user = None;
        state.phase = state.phase.transition(SessionEvent::Clear)?;

        self.slots.remove(&self.token_slot).await?;
        self.persist(&SessionRecord::blank()).await
    }

    /// Restore a persisted identity and confirm it with the server.
    ///
    /// Runs once per instance; later calls return immediately. The cache is
    /// hydrated afterwards whatever the outcome.
    pub async fn rehydrate(&self) -> AppResult<()> {
        if self.rehydrate_started.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let result = self.revalidate().await;
        self.hydrated.store(true, Ordering::Release);
        result
    }

    /// Current state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        let is_authenticated = state.phase.is_authenticated() && state.user.is_some();
        SessionSnapshot {
            user: state.user.clone(),
            is_authenticated,
            is_admin: is_authenticated && state.user.as_ref().is_some_and(AccountView::is_admin),
            hydrated: self.is_hydrated(),
            phase: state.phase,
        }
    }

    /// The stored bearer token.
    pub async fn token(&self) -> AppResult<Option<String>> {
        self.slots.get(&self.token_slot).await
    }

    /// Whether a sign-in or revalidation is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Whether [`rehydrate`](Self::rehydrate) has finished.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    async fn load_record(&self) -> AppResult<Option<SessionRecord>> {
        let Some(value) = self.records.load(&self.record_name).await? else {
            return Ok(None);
        };
        let record = serde_json::from_value::<SessionRecord>(value)?;
        Ok(Some(record.normalized()))
    }

    async fn revalidate(&self) -> AppResult<()> {
        let record = match self.load_record().await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session record");
                return self.clear().await;
            }
        };
        let Some(user) = record.user else {
            return Ok(());
        };
        let Some(_guard) = PendingGuard::acquire(&self.pending) else {
            tracing::debug!("Sign-in in flight, skipping revalidation");
            return Ok(());
        };

        // The stored identity stays unconfirmed until the server answers.
        let seq = self.next_sequence();
        {
            let mut state = self.state.write().await;
            state.phase = state.phase.transition(SessionEvent::Rehydrate)?;
        }
        tracing::debug!(user_id = %user.id, "Revalidating persisted session");

        let token = self.slots.get(&self.token_slot).await?;
        let outcome = match token.as_deref() {
            Some(token) => self.api.refresh(token).await,
            None => Err(AppError::unauthorized("No stored token")),
        };
        if self.is_stale(seq) {
            tracing::debug!(seq, "Discarding superseded revalidation response");
            return Ok(());
        }

        let err = match outcome {
            Ok(payload) => match self.apply(payload, Some(seq)).await {
                Ok(Applied::Session(user)) => {
                    tracing::info!(user_id = %user.id, "Session revalidated");
                    return Ok(());
                }
                Ok(Applied::Superseded) => return Ok(()),
                Ok(Applied::Incomplete) => {
                    AppError::upstream("The server returned an incomplete session")
                }
                Err(err) => err,
            },
            Err(err) => err,
        };

        tracing::warn!(error = %err, "Session revalidation failed, clearing");
        if let Err(e) = self.api.logout(token.as_deref()).await {
            tracing::debug!(error = %e, "Server logout after failed revalidation failed");
        }
        self.reject().await;
        self.clear().await
    }

    /// Install a payload. When `seq` is given, the payload is dropped if a
    /// newer sequence started before the state lock was taken.
    async fn apply(&self, payload: LoginPayload, seq: Option<u64>) -> AppResult<Applied> {
        let Some((user, token)) = payload.into_parts() else {
            tracing::warn!("Ignoring incomplete login payload");
            return Ok(Applied::Incomplete);
        };

        let mut state = self.state.write().await;
        if seq.is_some_and(|seq| self.is_stale(seq)) {
            tracing::debug!(?seq, "Discarding superseded session response");
            return Ok(Applied::Superseded);
        }
        let from = if state.phase.is_pending() {
            state.phase
        } else {
            state
                .phase
                .transition(SessionEvent::Logout)?
                .transition(SessionEvent::Login)?
        };
        let next = from.transition(SessionEvent::Granted)?;

        self.slots.set(&self.token_slot, &token).await?;
        self.persist(&SessionRecord::from_user(Some(user.clone()))).await?;

        state.user = Some(user.clone());
        state.phase = next;
        tracing::info!(user_id = %user.id, role = %user.role, "Session established");
        Ok(Applied::Session(user))
    }

    async fn reject(&self) {
        let mut state = self.state.write().await;
        if let Ok(next) = state.phase.transition(SessionEvent::Rejected) {
            state.phase = next;
        }
    }

    async fn persist(&self, record: &SessionRecord) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        self.records.save(&self.record_name, &value).await
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn is_stale(&self, seq: u64) -> bool {
        self.sequence.load(Ordering::Acquire) != seq
    }
}
