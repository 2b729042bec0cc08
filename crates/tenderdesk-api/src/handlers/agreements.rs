//! Agreement lifecycle endpoints: signing status transitions, countersigned
//! document management, and signed-URL downloads.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::agreements;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tenderdesk_core::constants::{
    render_message, AGREEMENT_APPROVAL_CANCELLED_MESSAGE, AGREEMENT_APPROVED_MESSAGE,
    AGREEMENT_ON_HOLD_MESSAGE,
};
use tenderdesk_core::models::{AgreementStatus, FrameworkAgreement};
use tenderdesk_core::AppError;
use utoipa::ToSchema;

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/agreement",
    tag = "agreements",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug")
    ),
    responses(
        (status = 200, description = "Signed agreement details", body = agreements::SignedAgreementView),
        (status = 404, description = "No returned agreement", body = ErrorResponse)
    )
)]
pub async fn view_signed_agreement(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path((supplier_id, framework_slug)): Path<(i64, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let view = agreements::view_signed_agreement(&state, supplier_id, &framework_slug).await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/agreements/{document_name}",
    tag = "agreements",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug"),
        ("document_name" = String, Path, description = "Agreement document filename")
    ),
    responses(
        (status = 307, description = "Redirect to a time-limited download URL"),
        (status = 404, description = "Document or declaration not found", body = ErrorResponse)
    )
)]
pub async fn download_agreement_document(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path((supplier_id, framework_slug, document_name)): Path<(i64, String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url = agreements::agreement_document_url(
        &state,
        supplier_id,
        &framework_slug,
        &document_name,
    )
    .await?;
    Ok(Redirect::temporary(&url))
}

/// Legacy route for frameworks predating named agreement documents: the
/// document name is derived from the stored agreement path.
#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/agreement/download",
    tag = "agreements",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug")
    ),
    responses(
        (status = 307, description = "Redirect to a time-limited download URL"),
        (status = 404, description = "No agreement file", body = ErrorResponse)
    )
)]
pub async fn download_legacy_agreement(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path((supplier_id, framework_slug)): Path<(i64, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url =
        agreements::legacy_agreement_document_url(&state, supplier_id, &framework_slug).await?;
    Ok(Redirect::temporary(&url))
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationBody {
    pub name_of_organisation: String,
}

/// Where the caller wants to be sent next; passed through untouched so the
/// frontend can return to the listing it came from.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct NextStatusQuery {
    #[serde(default)]
    pub next_status: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgreementTransitionResponse {
    pub agreement: FrameworkAgreement,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_status: Option<String>,
}

#[utoipa::path(
    post,
    path = "/admin/v1/agreements/{agreement_id}/on-hold",
    tag = "agreements",
    params(
        ("agreement_id" = i64, Path, description = "Agreement ID"),
        NextStatusQuery
    ),
    request_body = OrganisationBody,
    responses(
        (status = 200, description = "Agreement put on hold", body = AgreementTransitionResponse),
        (status = 404, description = "Agreement not found", body = ErrorResponse)
    )
)]
pub async fn put_agreement_on_hold(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(agreement_id): Path<i64>,
    Query(query): Query<NextStatusQuery>,
    Json(body): Json<OrganisationBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let agreement = state
        .api
        .put_agreement_on_hold(agreement_id, &admin.email)
        .await?;
    Ok(Json(AgreementTransitionResponse {
        agreement,
        message: render_message(
            AGREEMENT_ON_HOLD_MESSAGE,
            &[("organisation_name", body.name_of_organisation.as_str())],
        ),
        next_status: query.next_status,
    }))
}

#[utoipa::path(
    post,
    path = "/admin/v1/agreements/{agreement_id}/approve",
    tag = "agreements",
    params(
        ("agreement_id" = i64, Path, description = "Agreement ID"),
        NextStatusQuery
    ),
    request_body = OrganisationBody,
    responses(
        (status = 200, description = "Agreement approved for countersignature", body = AgreementTransitionResponse),
        (status = 400, description = "Already approved or countersigned", body = ErrorResponse),
        (status = 404, description = "Agreement not found", body = ErrorResponse)
    )
)]
pub async fn approve_agreement(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(agreement_id): Path<i64>,
    Query(query): Query<NextStatusQuery>,
    Json(body): Json<OrganisationBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let current = state.api.get_framework_agreement(agreement_id).await?;
    if current.status.is_approved_or_countersigned() {
        return Err(HttpAppError(AppError::BadRequest(
            "Agreement is already approved for countersignature".to_string(),
        )));
    }

    let agreement = state
        .api
        .approve_agreement_for_countersignature(agreement_id, &admin.email, admin.user_id)
        .await?;
    Ok(Json(AgreementTransitionResponse {
        agreement,
        message: render_message(
            AGREEMENT_APPROVED_MESSAGE,
            &[("organisation_name", body.name_of_organisation.as_str())],
        ),
        next_status: query.next_status,
    }))
}

#[utoipa::path(
    post,
    path = "/admin/v1/agreements/{agreement_id}/unapprove",
    tag = "agreements",
    params(
        ("agreement_id" = i64, Path, description = "Agreement ID"),
        NextStatusQuery
    ),
    request_body = OrganisationBody,
    responses(
        (status = 200, description = "Approval cancelled", body = AgreementTransitionResponse),
        (status = 400, description = "Agreement is not approved", body = ErrorResponse),
        (status = 404, description = "Agreement not found", body = ErrorResponse)
    )
)]
pub async fn unapprove_agreement(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(agreement_id): Path<i64>,
    Query(query): Query<NextStatusQuery>,
    Json(body): Json<OrganisationBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let current = state.api.get_framework_agreement(agreement_id).await?;
    if current.status != AgreementStatus::Approved {
        return Err(HttpAppError(AppError::BadRequest(
            "Only an approved agreement can have its approval cancelled".to_string(),
        )));
    }

    let agreement = state
        .api
        .unapprove_agreement_for_countersignature(agreement_id, &admin.email, admin.user_id)
        .await?;
    Ok(Json(AgreementTransitionResponse {
        agreement,
        message: render_message(
            AGREEMENT_APPROVAL_CANCELLED_MESSAGE,
            &[("organisation_name", body.name_of_organisation.as_str())],
        ),
        next_status: query.next_status,
    }))
}

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/countersigned-agreement",
    tag = "agreements",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug")
    ),
    responses(
        (status = 200, description = "Countersigned agreement state", body = agreements::CountersignedAgreementView),
        (status = 404, description = "No manageable agreement", body = ErrorResponse)
    )
)]
pub async fn get_countersigned_agreement(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path((supplier_id, framework_slug)): Path<(i64, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let view = agreements::countersigned_agreement(&state, supplier_id, &framework_slug).await?;
    Ok(Json(view))
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountersignedUploadResponse {
    pub agreement: FrameworkAgreement,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/countersigned-agreement",
    tag = "agreements",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug")
    ),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Countersigned agreement stored", body = CountersignedUploadResponse),
        (status = 400, description = "File is not a PDF", body = ErrorResponse),
        (status = 404, description = "No manageable agreement", body = ErrorResponse)
    )
)]
pub async fn upload_countersigned_agreement(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((supplier_id, framework_slug)): Path<(i64, String)>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut data = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        HttpAppError(AppError::BadRequest(format!(
            "Invalid multipart body: {}",
            e
        )))
    })? {
        if field.name() == Some("countersigned_agreement") {
            data = Some(field.bytes().await.map_err(|e| {
                HttpAppError(AppError::BadRequest(format!(
                    "Failed to read uploaded file: {}",
                    e
                )))
            })?);
            break;
        }
    }
    let data = data.ok_or_else(|| {
        HttpAppError(AppError::BadRequest(
            "Missing 'countersigned_agreement' file field".to_string(),
        ))
    })?;

    let (agreement, message) = agreements::upload_countersigned_agreement(
        &state,
        &admin,
        supplier_id,
        &framework_slug,
        data,
    )
    .await?;
    Ok(Json(CountersignedUploadResponse { agreement, message }))
}

#[utoipa::path(
    delete,
    path = "/admin/v1/suppliers/{supplier_id}/frameworks/{framework_slug}/countersigned-agreement",
    tag = "agreements",
    params(
        ("supplier_id" = i64, Path, description = "Supplier ID"),
        ("framework_slug" = String, Path, description = "Framework slug")
    ),
    responses(
        (status = 200, description = "Countersigned agreement removed", body = FrameworkAgreement),
        (status = 404, description = "No countersigned agreement", body = ErrorResponse)
    )
)]
pub async fn remove_countersigned_agreement(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path((supplier_id, framework_slug)): Path<(i64, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let agreement = agreements::remove_countersigned_agreement(
        &state,
        &admin,
        supplier_id,
        &framework_slug,
    )
    .await?;
    Ok(Json(agreement))
}
