//! Supplier user management: listing, unlock/activate, moves and invites.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tenderdesk_core::constants::{
    USER_INVITED_MESSAGE, USER_MOVED_MESSAGE, USER_NOT_MOVED_MESSAGE,
};
use tenderdesk_core::models::{AuditEvent, AuditType, SupplierUser, UserUpdate};
use tenderdesk_core::AppError;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUsersResponse {
    pub supplier_id: i64,
    pub users: Vec<SupplierUser>,
}

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/users",
    tag = "users",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "The supplier's users", body = SupplierUsersResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path(supplier_id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    // 404 for an unknown supplier rather than an empty list.
    state.api.get_supplier(supplier_id).await?;
    let users = state.api.find_users(supplier_id).await?;
    Ok(Json(SupplierUsersResponse { supplier_id, users }))
}

#[utoipa::path(
    post,
    path = "/admin/v1/users/{user_id}/unlock",
    tag = "users",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User unlocked", body = SupplierUser),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn unlock_user(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .api
        .update_user(user_id, &UserUpdate::unlock(), &admin.email)
        .await?;
    info!(user_id, "User unlocked");
    Ok(Json(user))
}

#[derive(Deserialize, ToSchema)]
pub struct ActivateBody {
    pub active: bool,
}

#[utoipa::path(
    post,
    path = "/admin/v1/users/{user_id}/activate",
    tag = "users",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = ActivateBody,
    responses(
        (status = 200, description = "User activation state changed", body = SupplierUser),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn activate_user(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(user_id): Path<i64>,
    Json(body): Json<ActivateBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .api
        .update_user(user_id, &UserUpdate::activate(body.active), &admin.email)
        .await?;
    info!(user_id, active = body.active, "User activation updated");
    Ok(Json(user))
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveUserBody {
    #[validate(email(message = "A valid email address is required"))]
    pub email_address: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveUserResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SupplierUser>,
}

/// Move an existing user to this supplier. An unknown email address is not
/// an error; the response just says the user was not moved.
#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/users/move",
    tag = "users",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    request_body = MoveUserBody,
    responses(
        (status = 200, description = "Move outcome", body = MoveUserResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn move_user(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<MoveUserBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.api.get_supplier(supplier_id).await?;

    let existing = state.api.get_user_by_email(&body.email_address).await?;
    let Some(existing) = existing else {
        return Ok(Json(MoveUserResponse {
            message: USER_NOT_MOVED_MESSAGE.to_string(),
            user: None,
        }));
    };

    let user = state
        .api
        .update_user(
            existing.id,
            &UserUpdate::move_to_supplier(supplier_id),
            &admin.email,
        )
        .await?;
    info!(supplier_id, user_id = user.id, "User moved to supplier");
    Ok(Json(MoveUserResponse {
        message: USER_MOVED_MESSAGE.to_string(),
        user: Some(user),
    }))
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserBody {
    #[validate(email(message = "A valid email address is required"))]
    pub email_address: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/users/invite",
    tag = "users",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    request_body = InviteUserBody,
    responses(
        (status = 200, description = "Invitation sent", body = InviteUserResponse),
        (status = 400, description = "Validation failed or invites disabled", body = ErrorResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn invite_user(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<InviteUserBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let supplier = state.api.get_supplier(supplier_id).await?;

    let email_service = state.email.as_ref().ok_or_else(|| {
        HttpAppError(AppError::BadRequest(
            "User invitations are not enabled".to_string(),
        ))
    })?;

    email_service
        .send_invite(&body.email_address, supplier_id, &supplier.name)
        .await?;

    state
        .api
        .create_audit_event(&AuditEvent::for_supplier(
            AuditType::InviteUser,
            &admin.email,
            supplier_id,
            json!({ "invitedEmail": body.email_address }),
        ))
        .await?;

    info!(supplier_id, "Supplier user invited");
    Ok(Json(InviteUserResponse {
        message: USER_INVITED_MESSAGE.to_string(),
    }))
}
