//! Agreement document workflows: signed-agreement view, countersigned
//! uploads and removal, and signed download URLs.

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use tenderdesk_client::ClientError;
use tenderdesk_core::constants::{
    AGREEMENTS_CATEGORY, COUNTERPART_FILENAME, COUNTERSIGNED_AGREEMENT_NOT_PDF_MESSAGE,
    UPLOAD_COUNTERSIGNED_AGREEMENT_MESSAGE,
};
use tenderdesk_core::models::{
    AgreementUpdate, AuditEvent, AuditType, Framework, FrameworkAgreement, FrameworkStatus,
    ServiceStatus, SupplierFramework,
};
use tenderdesk_core::AppError;
use tenderdesk_storage::keys;
use tenderdesk_storage::SaveOptions;

use crate::auth::AdminContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::validation::file_is_pdf;

/// Signed-agreement page data for one supplier-framework pair.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedAgreementView {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub framework_slug: String,
    pub framework_name: String,
    pub lot_names: Vec<String>,
    /// Time-limited download URL for the agreement document, when one has
    /// been stored.
    pub document_url: Option<String>,
    pub document_name: Option<String>,
    /// Lowercased file extension of the stored document, for display.
    pub document_extension: Option<String>,
}

/// Countersigned-agreement management page data.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountersignedAgreementView {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub framework_slug: String,
    pub agreement_status: Option<tenderdesk_core::models::AgreementStatus>,
    pub countersigned_path: Option<String>,
    pub countersigned_document_name: Option<String>,
}

async fn supplier_display_name(
    state: &AppState,
    supplier_framework: &SupplierFramework,
) -> Result<String, HttpAppError> {
    if let Some(name) = supplier_framework.declared_organisation_name() {
        return Ok(name.to_string());
    }
    let supplier = state
        .api
        .get_supplier(supplier_framework.supplier_id)
        .await?;
    Ok(supplier.name)
}

async fn manageable_supplier_framework(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
) -> Result<SupplierFramework, HttpAppError> {
    let supplier_framework = state
        .api
        .get_supplier_framework(supplier_id, framework_slug)
        .await?;
    if !supplier_framework.agreement_manageable() {
        return Err(HttpAppError(AppError::NotFound(
            "No agreement to manage for this supplier and framework".to_string(),
        )));
    }
    Ok(supplier_framework)
}

fn signed_url_expiry(state: &AppState) -> Duration {
    Duration::from_secs(state.config.signed_url_expiry_secs)
}

/// Lot names to show alongside the agreement. Live and expired frameworks
/// have real services; earlier statuses only have submitted drafts.
async fn agreement_lot_names(
    state: &AppState,
    supplier_id: i64,
    framework: &Framework,
) -> Result<Vec<String>, HttpAppError> {
    let mut lot_names: Vec<String> = if framework.status >= FrameworkStatus::Live {
        state
            .api
            .find_services(supplier_id, Some(&framework.slug), None)
            .await?
            .into_iter()
            .map(|s| s.lot_name)
            .collect()
    } else {
        state
            .api
            .find_draft_services(supplier_id, Some(&framework.slug))
            .await?
            .into_iter()
            .filter(|d| d.status == ServiceStatus::Submitted)
            .map(|d| d.lot_name)
            .collect()
    };
    lot_names.sort();
    lot_names.dedup();
    Ok(lot_names)
}

/// Build the signed-agreement view. 404 unless the framework carries an
/// agreement version and the supplier has returned their agreement.
pub async fn view_signed_agreement(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
) -> Result<SignedAgreementView, HttpAppError> {
    let framework = state.api.get_framework(framework_slug).await?;
    if framework.framework_agreement_version.is_none() {
        return Err(HttpAppError(AppError::NotFound(
            "Framework has no agreement version".to_string(),
        )));
    }

    let supplier_framework = state
        .api
        .get_supplier_framework(supplier_id, framework_slug)
        .await?;
    if !supplier_framework.agreement_returned {
        return Err(HttpAppError(AppError::NotFound(
            "Supplier has not returned an agreement for this framework".to_string(),
        )));
    }

    // Legacy frameworks show the supplier's signature page; e-signature
    // frameworks show the countersigned document.
    let document_path = if framework.e_signature_supported {
        supplier_framework.countersigned_path.clone()
    } else {
        supplier_framework.agreement_path.clone()
    };

    let document_url = match &document_path {
        Some(path) => Some(
            state
                .storage
                .signed_url(path, signed_url_expiry(state))
                .await?,
        ),
        None => None,
    };

    let supplier_name = supplier_display_name(state, &supplier_framework).await?;
    let lot_names = agreement_lot_names(state, supplier_id, &framework).await?;

    Ok(SignedAgreementView {
        supplier_id,
        supplier_name,
        framework_slug: framework.slug,
        framework_name: framework.name,
        lot_names,
        document_name: document_path
            .as_deref()
            .map(keys::document_name_from_path),
        document_extension: document_path.as_deref().and_then(keys::extension),
        document_url,
    })
}

/// Countersigned-agreement state for the management page. 404 unless the
/// agreement is manageable.
pub async fn countersigned_agreement(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
) -> Result<CountersignedAgreementView, HttpAppError> {
    let supplier_framework =
        manageable_supplier_framework(state, supplier_id, framework_slug).await?;
    let supplier_name = supplier_display_name(state, &supplier_framework).await?;

    Ok(CountersignedAgreementView {
        supplier_id,
        supplier_name,
        framework_slug: framework_slug.to_string(),
        agreement_status: supplier_framework.agreement_status,
        countersigned_document_name: supplier_framework
            .countersigned_path
            .as_deref()
            .map(keys::document_name_from_path),
        countersigned_path: supplier_framework.countersigned_path,
    })
}

/// Store an uploaded countersigned agreement. Approves the agreement first
/// when it is not yet approved or countersigned.
pub async fn upload_countersigned_agreement(
    state: &AppState,
    admin: &AdminContext,
    supplier_id: i64,
    framework_slug: &str,
    data: Bytes,
) -> Result<(FrameworkAgreement, String), HttpAppError> {
    let supplier_framework =
        manageable_supplier_framework(state, supplier_id, framework_slug).await?;
    let agreement_id = supplier_framework.agreement_id.ok_or_else(|| {
        HttpAppError(AppError::NotFound(
            "Supplier framework has no agreement record".to_string(),
        ))
    })?;

    // Content sniff; the filename and Content-Type are client-controlled.
    if !file_is_pdf(&data) {
        return Err(HttpAppError(AppError::BadRequest(
            COUNTERSIGNED_AGREEMENT_NOT_PDF_MESSAGE.to_string(),
        )));
    }

    if !supplier_framework
        .agreement_status
        .is_some_and(|s| s.is_approved_or_countersigned())
    {
        state
            .api
            .approve_agreement_for_countersignature(agreement_id, &admin.email, admin.user_id)
            .await?;
    }

    let supplier_name = supplier_display_name(state, &supplier_framework).await?;
    let path = keys::timestamped_document_path(
        framework_slug,
        supplier_id,
        AGREEMENTS_CATEGORY,
        COUNTERPART_FILENAME,
        Utc::now(),
    );

    let options = SaveOptions::pdf().with_download_filename(keys::download_filename(
        &supplier_name,
        supplier_id,
        COUNTERPART_FILENAME,
    ));
    state.storage.save(&path, data, options).await?;

    let agreement = state
        .api
        .update_framework_agreement(
            agreement_id,
            &AgreementUpdate::countersigned_path(&path),
            &admin.email,
        )
        .await?;

    state
        .api
        .create_audit_event(&AuditEvent::for_supplier(
            AuditType::UploadCountersignedAgreement,
            &admin.email,
            supplier_id,
            json!({ "path": path, "frameworkSlug": framework_slug }),
        ))
        .await?;

    info!(
        supplier_id,
        framework_slug, agreement_id, "Countersigned agreement uploaded"
    );

    Ok((
        agreement,
        UPLOAD_COUNTERSIGNED_AGREEMENT_MESSAGE.to_string(),
    ))
}

/// Remove a countersigned agreement. The stored path reference is cleared
/// before the object delete: an orphaned object in storage is tolerable, a
/// dangling reference is not.
pub async fn remove_countersigned_agreement(
    state: &AppState,
    admin: &AdminContext,
    supplier_id: i64,
    framework_slug: &str,
) -> Result<FrameworkAgreement, HttpAppError> {
    let supplier_framework =
        manageable_supplier_framework(state, supplier_id, framework_slug).await?;
    let agreement_id = supplier_framework.agreement_id.ok_or_else(|| {
        HttpAppError(AppError::NotFound(
            "Supplier framework has no agreement record".to_string(),
        ))
    })?;
    let path = supplier_framework.countersigned_path.ok_or_else(|| {
        HttpAppError(AppError::NotFound(
            "No countersigned agreement to remove".to_string(),
        ))
    })?;

    let agreement = state
        .api
        .update_framework_agreement(
            agreement_id,
            &AgreementUpdate::clear_countersigned_path(),
            &admin.email,
        )
        .await?;

    if let Err(e) = state.storage.delete(&path).await {
        warn!(
            supplier_id,
            framework_slug,
            path = %path,
            error = %e,
            "Failed to delete countersigned agreement object; reference already cleared"
        );
    }

    state
        .api
        .create_audit_event(&AuditEvent::for_supplier(
            AuditType::DeleteCountersignedAgreement,
            &admin.email,
            supplier_id,
            json!({ "path": path, "frameworkSlug": framework_slug }),
        ))
        .await?;

    info!(
        supplier_id,
        framework_slug, agreement_id, "Countersigned agreement removed"
    );

    Ok(agreement)
}

/// Resolve a named agreement document to a signed download URL. 404 when the
/// supplier has no declaration for the framework or the document does not
/// exist in storage.
pub async fn agreement_document_url(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
    document_name: &str,
) -> Result<String, HttpAppError> {
    let declaration = match state
        .api
        .get_supplier_declaration(supplier_id, framework_slug)
        .await
    {
        Ok(declaration) => declaration,
        Err(ClientError::NotFound) => {
            return Err(HttpAppError(AppError::NotFound(
                "Supplier has no declaration for this framework".to_string(),
            )))
        }
        Err(e) => return Err(e.into()),
    };
    if declaration.is_empty() {
        return Err(HttpAppError(AppError::NotFound(
            "Supplier has no declaration for this framework".to_string(),
        )));
    }

    let key = keys::document_path(
        framework_slug,
        supplier_id,
        AGREEMENTS_CATEGORY,
        document_name,
    );
    if !state.storage.exists(&key).await? {
        return Err(HttpAppError(AppError::NotFound(format!(
            "Agreement document '{}' not found",
            document_name
        ))));
    }

    Ok(state.storage.signed_url(&key, signed_url_expiry(state)).await?)
}

/// Legacy download route: the document name is derived from the stored
/// agreement path rather than supplied by the caller.
pub async fn legacy_agreement_document_url(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
) -> Result<String, HttpAppError> {
    let supplier_framework = state
        .api
        .get_supplier_framework(supplier_id, framework_slug)
        .await?;
    let agreement_path = supplier_framework.agreement_path.as_deref().ok_or_else(|| {
        HttpAppError(AppError::NotFound(
            "Supplier has no agreement file for this framework".to_string(),
        ))
    })?;

    let document_name = keys::document_name_from_path(agreement_path);
    agreement_document_url(state, supplier_id, framework_slug, &document_name).await
}
