//! Supplier service listing and publication toggling.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::service_toggle;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/services",
    tag = "services",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Services grouped by framework", body = Vec<service_toggle::ServicesByFramework>),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path(supplier_id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let groups = service_toggle::services_by_framework(&state, supplier_id).await?;
    Ok(Json(groups))
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleServicesBody {
    #[validate(length(min = 1, message = "Framework slug is required"))]
    pub framework_slug: String,
    /// True to suspend all published services, false to unsuspend all
    /// disabled ones.
    pub suspend: bool,
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/services/toggle",
    tag = "services",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    request_body = ToggleServicesBody,
    responses(
        (status = 200, description = "Per-service toggle outcomes", body = service_toggle::ToggleResult),
        (status = 400, description = "Framework not live, or no services in the source status", body = ErrorResponse)
    )
)]
pub async fn toggle_services(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<ToggleServicesBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let result = service_toggle::toggle_services(
        &state,
        &admin,
        supplier_id,
        &body.framework_slug,
        body.suspend,
    )
    .await?;
    Ok(Json(result))
}
