//! Session endpoints as seen from the client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use civichub_core::config::ClientConfig;
use civichub_core::error::{AppError, ErrorKind};
use civichub_core::result::AppResult;
use civichub_entity::account::{AccountRole, AccountView};

/// Request timeout for session calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Email and secret submitted by the user.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    /// Login email.
    pub email: String,
    /// Plaintext secret.
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginCredentials {
    /// Build credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Identity as returned by the server. Every field is optional because the
/// payload is untrusted until [`LoginPayload::into_parts`] checks it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadUser {
    /// Account id.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Role.
    #[serde(default)]
    pub role: Option<AccountRole>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<AccountView> for PayloadUser {
    fn from(view: AccountView) -> Self {
        Self {
            id: Some(view.id),
            email: Some(view.email),
            username: Some(view.username),
            role: Some(view.role),
            created_at: Some(view.created_at),
            updated_at: Some(view.updated_at),
        }
    }
}

/// Body of a successful login or verify call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginPayload {
    /// The signed-in identity.
    #[serde(default)]
    pub user: Option<PayloadUser>,
    /// Bearer token.
    #[serde(default)]
    pub token: Option<String>,
    /// Token expiry.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl LoginPayload {
    /// A well-formed payload for `user`.
    pub fn new(user: AccountView, token: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            token: Some(token.into()),
            expires_at: None,
        }
    }

    /// Split into an identity and a token.
    ///
    /// Returns `None` unless the id, email, role, and a non-blank token are
    /// all present.
    pub fn into_parts(self) -> Option<(AccountView, String)> {
        let user = self.user?;
        let token = self.token.filter(|t| !t.trim().is_empty())?;
        let email = user.email.filter(|e| !e.trim().is_empty())?;
        let now = Utc::now();

        let view = AccountView {
            id: user.id?,
            username: user.username.unwrap_or_default(),
            email,
            role: user.role?,
            created_at: user.created_at.unwrap_or(now),
            updated_at: user.updated_at.unwrap_or(now),
        };
        Some((view, token))
    }
}

/// Server calls the session cache depends on.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<LoginPayload>;

    /// Confirm `token` and obtain a fresh one.
    async fn refresh(&self, token: &str) -> AppResult<LoginPayload>;

    /// Tell the server the session is over.
    async fn logout(&self, token: Option<&str>) -> AppResult<()>;
}

/// [`SessionApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSessionApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl HttpSessionApi {
    /// Create a client for the server at `base_url` (without `/api`).
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the client configuration.
    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Self::new(config.base_url.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    async fn read_payload(response: reqwest::Response) -> AppResult<LoginPayload> {
        let response = check_response(response).await?;
        response.json::<LoginPayload>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::UpstreamFailure,
                format!("Malformed session response: {e}"),
                e,
            )
        })
    }
}

/// Pass successful responses through; map error statuses onto [`AppError`]
/// using the server's `{error, message}` body when present.
pub(crate) async fn check_response(response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("Request failed with status {status}"));

    Err(match status {
        StatusCode::BAD_REQUEST => AppError::validation(message),
        StatusCode::UNAUTHORIZED => AppError::unauthorized(message),
        StatusCode::FORBIDDEN => AppError::forbidden(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::CONFLICT => AppError::conflict(message),
        _ => AppError::upstream(message),
    })
}

pub(crate) fn transport_error(err: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::UpstreamFailure,
        format!("Could not reach the server: {err}"),
        err,
    )
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<LoginPayload> {
        let response = self
            .client
            .post(self.endpoint("/login"))
            .json(credentials)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_payload(response).await
    }

    async fn refresh(&self, token: &str) -> AppResult<LoginPayload> {
        let response = self
            .client
            .get(self.endpoint("/verify"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_payload(response).await
    }

    async fn logout(&self, token: Option<&str>) -> AppResult<()> {
        let mut request = self.client.post(self.endpoint("/logout"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(transport_error)?;
        check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> AccountView {
        AccountView {
            id: Uuid::new_v4(),
            email: "admin@civichub.org".into(),
            username: "admin".into(),
            role: AccountRole::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_complete_payload_splits() {
        let user = view();
        let (parsed, token) = LoginPayload::new(user.clone(), "tok").into_parts().unwrap();
        assert_eq!(parsed, user);
        assert_eq!(token, "tok");
    }

    #[test]
    fn test_blank_token_is_rejected() {
        assert!(LoginPayload::new(view(), "  ").into_parts().is_none());
    }

    #[test]
    fn test_missing_role_is_rejected() {
        let mut payload = LoginPayload::new(view(), "tok");
        if let Some(user) = payload.user.as_mut() {
            user.role = None;
        }
        assert!(payload.into_parts().is_none());
    }

    #[test]
    fn test_missing_user_is_rejected() {
        let payload: LoginPayload = serde_json::from_str(r#"{"token":"tok"}"#).unwrap();
        assert!(payload.into_parts().is_none());
    }

    #[test]
    fn test_server_body_deserializes() {
        let body = r#"{
            "user": {"id": "0191e1d8-6f3c-7aa1-9a35-2f3f3c1f0e11", "email": "a@b.co",
                     "username": "a", "role": "admin"},
            "token": "abc",
            "expires_at": "2026-01-01T00:00:00Z"
        }"#;
        let payload: LoginPayload = serde_json::from_str(body).unwrap();
        let (user, token) = payload.into_parts().unwrap();
        assert!(user.is_admin());
        assert_eq!(token, "abc");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let api = HttpSessionApi::new("http://localhost:8080/").unwrap();
        assert_eq!(api.endpoint("/login"), "http://localhost:8080/api/login");
    }
}
