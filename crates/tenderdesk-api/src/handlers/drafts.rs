//! Draft service listing endpoint.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::drafts;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/draft-services",
    tag = "services",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Draft services per framework with completeness counts", body = Vec<drafts::DraftsByFramework>),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn list_draft_services(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let groups = drafts::drafts_by_framework(&state, &admin, supplier_id).await?;
    Ok(Json(groups))
}
