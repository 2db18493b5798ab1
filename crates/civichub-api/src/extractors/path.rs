//! Typed path parameters.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use civichub_core::error::AppError;

use crate::error::ApiError;

/// The `{id}` segment of `/api/admins/{id}`.
#[derive(Debug, Clone, Copy)]
pub struct AccountId(pub Uuid);

impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Missing account id"))?;
        let id = Uuid::parse_str(&raw)
            .map_err(|_| AppError::validation(format!("'{raw}' is not a valid account id")))?;
        Ok(Self(id))
    }
}
