//! Session handlers: login, verify, logout.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use civichub_auth::SessionGrant;
use civichub_core::config::CookieConfig;

use crate::dto::request::{LoginRequest, validated};
use crate::dto::response::{MessageResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser};
use crate::state::AppState;

/// Builds the HTTP-only session cookie.
fn session_cookie(config: &CookieConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(config.max_age_hours))
        .build()
}

fn with_grant(
    state: &AppState,
    jar: CookieJar,
    grant: SessionGrant,
) -> (CookieJar, Json<SessionResponse>) {
    let jar = jar.add(session_cookie(&state.config.auth.cookie, grant.token.clone()));
    (jar, Json(SessionResponse::from(grant)))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let req = validated(req)?;
    let grant = state.sessions.login(&req.email, &req.password).await?;
    Ok(with_grant(&state, jar, grant))
}

/// GET /api/verify
///
/// Confirms the presented token and hands back a fresh one carrying the
/// account's current email and role.
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthUser(claims): AuthUser,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let grant = state.sessions.refresh(&claims).await?;
    Ok(with_grant(&state, jar, grant))
}

/// POST /api/logout
///
/// Tokens are stateless; logging out only drops the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let removal = Cookie::build((state.config.auth.cookie.name.clone(), "")).path("/");
    (jar.remove(removal), Json(MessageResponse::new("Logged out")))
}
