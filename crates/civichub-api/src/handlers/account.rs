//! Administrator account management.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use civichub_entity::account::AccountView;

use crate::dto::request::{CreateAdminRequest, UpdateAdminRequest, validated};
use crate::dto::response::{AdminListResponse, AdminResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AccountId, AdminUser, ApiJson};
use crate::state::AppState;

/// GET /api/admins
pub async fn list_admins(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<AdminListResponse>, ApiError> {
    let admins = state
        .credentials()
        .list()
        .await?
        .into_iter()
        .map(AccountView::from)
        .collect();
    Ok(Json(AdminListResponse { admins }))
}

/// POST /api/admins
pub async fn create_admin(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(req): ApiJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminResponse>), ApiError> {
    let req = validated(req)?;
    let account = state.credentials().create(req.into()).await?;
    tracing::info!(created_by = %admin.sub, account_id = %account.id, "Admin created account");
    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            admin: account.view(),
            message: Some("Admin created".to_string()),
        }),
    ))
}

/// GET /api/admins/{id}
pub async fn get_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    AccountId(id): AccountId,
) -> Result<Json<AdminResponse>, ApiError> {
    let account = state.credentials().find(id).await?;
    Ok(Json(AdminResponse {
        admin: account.view(),
        message: None,
    }))
}

/// PUT /api/admins/{id}
pub async fn update_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    AccountId(id): AccountId,
    ApiJson(req): ApiJson<UpdateAdminRequest>,
) -> Result<Json<AdminResponse>, ApiError> {
    let req = validated(req)?;
    let account = state.credentials().update(id, req.into()).await?;
    Ok(Json(AdminResponse {
        admin: account.view(),
        message: None,
    }))
}

/// DELETE /api/admins/{id}
pub async fn delete_admin(
    State(state): State<AppState>,
    admin: AdminUser,
    AccountId(id): AccountId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.credentials().delete(id).await?;
    tracing::info!(deleted_by = %admin.sub, account_id = %id, "Admin deleted account");
    Ok(Json(MessageResponse::new("Admin deleted")))
}
