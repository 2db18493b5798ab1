//! Authorization guard extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use civichub_auth::Claims;
use civichub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// A request carrying a valid session token, from the `Authorization`
/// header or the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(&state.config.auth.cookie.name)
            .map(|c| c.value());

        let claims = state.sessions.authorize(header, cookie)?;
        Ok(AuthUser(claims))
    }
}

/// An [`AuthUser`] whose token carries the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl std::ops::Deref for AdminUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            tracing::warn!(account_id = %claims.sub, "Non-admin hit an admin route");
            return Err(AppError::forbidden("Admin access required").into());
        }
        Ok(AdminUser(claims))
    }
}
