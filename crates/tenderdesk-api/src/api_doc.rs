//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services;
use tenderdesk_core::models;

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tenderdesk Admin API",
        version = "0.1.0",
        description = "Internal administration API for the marketplace procurement \
            platform: supplier registration details, declarations, framework \
            agreement signing, service publication, and supplier user management. \
            All endpoints are under /admin/v1/ and require an admin JWT."
    ),
    paths(
        // Suppliers
        handlers::suppliers::search_suppliers,
        handlers::suppliers::get_supplier,
        handlers::suppliers::update_supplier_name,
        handlers::suppliers::update_registered_name,
        handlers::suppliers::update_registered_address,
        handlers::suppliers::update_company_number,
        handlers::suppliers::get_duns_number,
        // Declarations
        handlers::declarations::view_declaration,
        handlers::declarations::view_declaration_section,
        handlers::declarations::update_declaration_section,
        // Agreements
        handlers::agreements::view_signed_agreement,
        handlers::agreements::download_agreement_document,
        handlers::agreements::download_legacy_agreement,
        handlers::agreements::put_agreement_on_hold,
        handlers::agreements::approve_agreement,
        handlers::agreements::unapprove_agreement,
        handlers::agreements::get_countersigned_agreement,
        handlers::agreements::upload_countersigned_agreement,
        handlers::agreements::remove_countersigned_agreement,
        // Services
        handlers::services::list_services,
        handlers::services::toggle_services,
        handlers::drafts::list_draft_services,
        // Users
        handlers::users::list_users,
        handlers::users::unlock_user,
        handlers::users::activate_user,
        handlers::users::move_user,
        handlers::users::invite_user,
    ),
    components(schemas(
        error::ErrorResponse,
        models::Supplier,
        models::SupplierFramework,
        models::Framework,
        models::FrameworkStatus,
        models::FrameworkAgreement,
        models::AgreementStatus,
        models::Service,
        models::ServiceStatus,
        models::DraftService,
        models::SupplierUser,
        services::agreements::SignedAgreementView,
        services::agreements::CountersignedAgreementView,
        services::declarations::DeclarationView,
        services::declarations::DeclarationSectionView,
        services::declarations::DeclarationUpdateResult,
        services::service_toggle::ServicesByFramework,
        services::service_toggle::ToggleOutcome,
        services::service_toggle::ToggleResult,
        services::drafts::AnnotatedDraft,
        services::drafts::DraftsByFramework,
    )),
    tags(
        (name = "suppliers", description = "Supplier search and registration details"),
        (name = "declarations", description = "Supplier declaration viewing and editing"),
        (name = "agreements", description = "Framework agreement signing lifecycle"),
        (name = "services", description = "Service listings and publication toggling"),
        (name = "users", description = "Supplier user management")
    )
)]
struct ApiDoc;
