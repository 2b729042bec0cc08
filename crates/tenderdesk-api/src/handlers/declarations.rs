//! Declaration viewing and section editing endpoints.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::declarations;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tenderdesk_content::Answers;

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/declaration",
    tag = "declarations",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug")
    ),
    responses(
        (status = 200, description = "Full declaration with visible questions", body = declarations::DeclarationView),
        (status = 403, description = "Framework not open for declaration viewing", body = ErrorResponse),
        (status = 404, description = "Framework unavailable", body = ErrorResponse)
    )
)]
pub async fn view_declaration(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path((supplier_id, framework_slug)): Path<(i64, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let view = declarations::view_declaration(&state, supplier_id, &framework_slug).await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/declaration/sections/{section_slug}",
    tag = "declarations",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug"),
        ("section_slug" = String, Path, description = "Declaration section slug")
    ),
    responses(
        (status = 200, description = "Section with current answers", body = declarations::DeclarationSectionView),
        (status = 403, description = "Framework not open for declaration editing", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse)
    )
)]
pub async fn view_declaration_section(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path((supplier_id, framework_slug, section_slug)): Path<(i64, String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let view = declarations::view_declaration_section(
        &state,
        supplier_id,
        &framework_slug,
        &section_slug,
    )
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/declaration/sections/{section_slug}",
    tag = "declarations",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug"),
        ("section_slug" = String, Path, description = "Declaration section slug")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Section updated (or unchanged)", body = declarations::DeclarationUpdateResult),
        (status = 403, description = "Framework not open for declaration editing", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse)
    )
)]
pub async fn update_declaration_section(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((supplier_id, framework_slug, section_slug)): Path<(i64, String, String)>,
    Json(posted): Json<Answers>,
) -> Result<impl IntoResponse, HttpAppError> {
    let result = declarations::update_declaration_section(
        &state,
        &admin,
        supplier_id,
        &framework_slug,
        &section_slug,
        posted,
    )
    .await?;
    Ok(Json(result))
}
