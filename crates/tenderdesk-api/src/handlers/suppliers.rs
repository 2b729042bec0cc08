//! Supplier search and registration-detail editing.

use crate::auth::AdminContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tenderdesk_client::{PageLinks, SupplierQuery};
use tenderdesk_core::constants::{render_message, SUPPLIER_DETAILS_UPDATED_MESSAGE};
use tenderdesk_core::models::{
    CompanyNumber, ContactInformationUpdate, FrameworkStatus, Supplier, SupplierFramework,
    SupplierUpdate,
};
use tenderdesk_core::AppError;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, utoipa::IntoParams)]
pub struct SupplierSearchQuery {
    #[serde(default)]
    pub supplier_id: Option<i64>,
    /// Case-sensitive name prefix.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub duns_number: Option<String>,
    #[serde(default)]
    pub company_registration_number: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkFilter {
    pub slug: String,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSearchResponse {
    pub suppliers: Vec<Supplier>,
    #[schema(value_type = Object)]
    pub links: PageLinks,
    /// Frameworks offered as search filters, newest first.
    pub framework_filters: Vec<FrameworkFilter>,
}

/// Frameworks at or after the oldest interesting one, excluding those not
/// yet open to interest. Newest first.
async fn framework_filters(state: &AppState) -> Result<Vec<FrameworkFilter>, HttpAppError> {
    let frameworks = state.api.find_frameworks().await?;
    let oldest_id = frameworks
        .iter()
        .find(|f| f.slug == state.config.oldest_interesting_framework_slug)
        .map(|f| f.id)
        .ok_or_else(|| {
            HttpAppError(AppError::Internal(format!(
                "Oldest interesting framework '{}' not found",
                state.config.oldest_interesting_framework_slug
            )))
        })?;

    let mut interesting: Vec<_> = frameworks
        .into_iter()
        .filter(|f| f.id >= oldest_id && f.status != FrameworkStatus::Coming)
        .collect();
    interesting.sort_by(|a, b| b.id.cmp(&a.id));

    Ok(interesting
        .into_iter()
        .map(|f| FrameworkFilter {
            slug: f.slug,
            name: f.name,
        })
        .collect())
}

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers",
    tag = "suppliers",
    params(SupplierSearchQuery),
    responses(
        (status = 200, description = "Matching suppliers", body = SupplierSearchResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn search_suppliers(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Query(params): Query<SupplierSearchQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let framework_filters = framework_filters(&state).await?;

    let query = SupplierQuery {
        supplier_id: params.supplier_id,
        name_prefix: params.name,
        duns_number: params.duns_number,
        company_registration_number: params.company_registration_number,
        framework: params.framework,
        page: params.page,
    };
    let page = state.api.find_suppliers(&query).await?;

    Ok(Json(SupplierSearchResponse {
        suppliers: page.suppliers,
        links: page.links,
        framework_filters,
    }))
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDetails {
    pub supplier: Supplier,
    pub frameworks: Vec<SupplierFramework>,
}

#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}",
    tag = "suppliers",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier details", body = SupplierDetails),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn get_supplier(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path(supplier_id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let supplier = state.api.get_supplier(supplier_id).await?;
    let frameworks = state.api.get_supplier_frameworks(supplier_id).await?;
    Ok(Json(SupplierDetails {
        supplier,
        frameworks,
    }))
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUpdated {
    pub supplier: Supplier,
    pub message: String,
}

fn updated_response(supplier: Supplier) -> Json<SupplierUpdated> {
    let message = render_message(
        SUPPLIER_DETAILS_UPDATED_MESSAGE,
        &[("supplier_name", supplier.name.as_str())],
    );
    Json(SupplierUpdated { supplier, message })
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct EditNameBody {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/name",
    tag = "suppliers",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    request_body = EditNameBody,
    responses(
        (status = 200, description = "Supplier name updated", body = SupplierUpdated),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn update_supplier_name(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<EditNameBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let supplier = state
        .api
        .update_supplier(supplier_id, &SupplierUpdate::name(body.name), &admin.email)
        .await?;
    info!(supplier_id, "Supplier name updated");
    Ok(updated_response(supplier))
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/registered-name",
    tag = "suppliers",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    request_body = EditNameBody,
    responses(
        (status = 200, description = "Registered name updated", body = SupplierUpdated),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn update_registered_name(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<EditNameBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let supplier = state
        .api
        .update_supplier(
            supplier_id,
            &SupplierUpdate::registered_name(body.name),
            &admin.email,
        )
        .await?;
    info!(supplier_id, "Supplier registered name updated");
    Ok(updated_response(supplier))
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditRegisteredAddressBody {
    #[validate(length(min = 1, max = 255, message = "Address line is required"))]
    pub address1: String,
    #[validate(length(min = 1, max = 255, message = "Town or city is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 15, message = "Postcode is required"))]
    pub postcode: String,
    #[validate(length(min = 1, max = 255, message = "Country is required"))]
    pub country: String,
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/registered-address",
    tag = "suppliers",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    request_body = EditRegisteredAddressBody,
    responses(
        (status = 200, description = "Registered address updated", body = SupplierUpdated),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Supplier or contact record not found", body = ErrorResponse)
    )
)]
pub async fn update_registered_address(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<EditRegisteredAddressBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let supplier = state.api.get_supplier(supplier_id).await?;
    let contact_id = supplier
        .contact_information
        .first()
        .map(|c| c.id)
        .ok_or_else(|| {
            HttpAppError(AppError::NotFound(
                "Supplier has no contact information record".to_string(),
            ))
        })?;

    let supplier = state
        .api
        .update_supplier(
            supplier_id,
            &SupplierUpdate::registration_country(body.country.clone()),
            &admin.email,
        )
        .await?;
    state
        .api
        .update_contact_information(
            supplier_id,
            contact_id,
            &ContactInformationUpdate {
                address1: body.address1,
                city: body.city,
                postcode: body.postcode,
                country: body.country,
            },
            &admin.email,
        )
        .await?;

    info!(supplier_id, "Supplier registered address updated");
    Ok(updated_response(supplier))
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditCompanyNumberBody {
    #[serde(default)]
    pub companies_house_number: Option<String>,
    #[serde(default)]
    pub other_company_registration_number: Option<String>,
}

#[utoipa::path(
    post,
    path = "/admin/v1/suppliers/{supplier_id}/company-registration-number",
    tag = "suppliers",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    request_body = EditCompanyNumberBody,
    responses(
        (status = 200, description = "Company number updated", body = SupplierUpdated),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn update_company_number(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    Path(supplier_id): Path<i64>,
    Json(body): Json<EditCompanyNumberBody>,
) -> Result<impl IntoResponse, HttpAppError> {
    let company_number = match (
        body.companies_house_number.as_deref().map(str::trim),
        body.other_company_registration_number.as_deref().map(str::trim),
    ) {
        (Some(ch), None) if !ch.is_empty() => {
            if !crate::validation::looks_like_companies_house_number(ch) {
                return Err(HttpAppError(AppError::InvalidInput(
                    "Companies House numbers must be 8 characters, such as 12345678 or SC123456"
                        .to_string(),
                )));
            }
            CompanyNumber::CompaniesHouse(ch.to_uppercase())
        }
        (None, Some(other)) if !other.is_empty() => CompanyNumber::Other(other.to_string()),
        _ => {
            return Err(HttpAppError(AppError::InvalidInput(
                "Provide either a Companies House number or another registration number, not both"
                    .to_string(),
            )))
        }
    };

    let number_value = company_number.value().to_string();
    let supplier = state
        .api
        .update_supplier(
            supplier_id,
            &SupplierUpdate::company_number(company_number),
            &admin.email,
        )
        .await?;

    // Keep the most recent declaration's own copy of the number in step.
    sync_declaration_company_number(&state, &admin, supplier_id, &number_value).await?;

    info!(supplier_id, "Supplier company registration number updated");
    Ok(updated_response(supplier))
}

/// The supplier's most recent framework interest with a declaration also
/// records the registration number; update it alongside the supplier.
async fn sync_declaration_company_number(
    state: &AppState,
    admin: &AdminContext,
    supplier_id: i64,
    number: &str,
) -> Result<(), HttpAppError> {
    let frameworks = state.api.find_frameworks().await?;
    let mut interests = state.api.get_supplier_frameworks(supplier_id).await?;
    interests.retain(|i| !i.declaration.is_empty());
    if interests.is_empty() {
        return Ok(());
    }
    // Newest framework first, by framework id.
    interests.sort_by_key(|i| {
        std::cmp::Reverse(
            frameworks
                .iter()
                .find(|f| f.slug == i.framework_slug)
                .map(|f| f.id)
                .unwrap_or(i64::MIN),
        )
    });

    let target = &interests[0];
    let mut answers = tenderdesk_core::models::Declaration::new();
    answers.insert(
        "supplierCompanyRegistrationNumber".to_string(),
        serde_json::json!(number),
    );
    state
        .api
        .update_supplier_declaration(supplier_id, &target.framework_slug, &answers, &admin.email)
        .await?;
    Ok(())
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DunsNumberView {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub duns_number: Option<String>,
}

/// DUNS numbers are corrected through supplier support, not edited here;
/// this read-only view backs the contact-support page.
#[utoipa::path(
    get,
    path = "/admin/v1/suppliers/{supplier_id}/duns-number",
    tag = "suppliers",
    params(("supplier_id" = i64, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "DUNS number", body = DunsNumberView),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    )
)]
pub async fn get_duns_number(
    State(state): State<Arc<AppState>>,
    _admin: AdminContext,
    Path(supplier_id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let supplier = state.api.get_supplier(supplier_id).await?;
    Ok(Json(DunsNumberView {
        supplier_id,
        supplier_name: supplier.name,
        duns_number: supplier.duns_number,
    }))
}
