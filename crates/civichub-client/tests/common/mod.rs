#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use civichub_client::{LoginCredentials, LoginPayload, SessionApi};
use civichub_core::error::AppError;
use civichub_core::result::AppResult;
use civichub_entity::account::{AccountRole, AccountView};

pub fn account(role: AccountRole) -> AccountView {
    AccountView {
        id: Uuid::new_v4(),
        email: "admin@civichub.org".into(),
        username: "admin".into(),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A [`SessionApi`] whose answers are set up front.
pub struct ScriptedApi {
    login: Mutex<AppResult<LoginPayload>>,
    refresh: Mutex<AppResult<LoginPayload>>,
    gate: Option<Arc<Notify>>,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            login: Mutex::new(Err(AppError::upstream("offline"))),
            refresh: Mutex::new(Err(AppError::upstream("offline"))),
            gate: None,
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_login(self, result: AppResult<LoginPayload>) -> Self {
        *self.login.lock().unwrap() = result;
        self
    }

    pub fn with_refresh(self, result: AppResult<LoginPayload>) -> Self {
        *self.refresh.lock().unwrap() = result;
        self
    }

    /// Hold every login and refresh call until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionApi for ScriptedApi {
    async fn login(&self, _credentials: &LoginCredentials) -> AppResult<LoginPayload> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.login.lock().unwrap().clone()
    }

    async fn refresh(&self, _token: &str) -> AppResult<LoginPayload> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.refresh.lock().unwrap().clone()
    }

    async fn logout(&self, _token: Option<&str>) -> AppResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
