//! Route configuration: per-domain route groups with role allow-lists,
//! wrapped in the shared middleware stack.

use crate::auth::{auth_middleware, require_roles, AdminRole, AuthState};
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::middleware::security_headers::SecurityHeadersConfig;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tenderdesk_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Countersigned agreements are single PDFs; anything much larger than this
/// is not a legitimate upload.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const ALL_ROLES: &[AdminRole] = &[
    AdminRole::Admin,
    AdminRole::CategoryManager,
    AdminRole::Sourcing,
    AdminRole::FrameworkManager,
    AdminRole::DataController,
];

fn roles(allowed: &[AdminRole]) -> Arc<Vec<AdminRole>> {
    Arc::new(allowed.to_vec())
}

/// Setup all application routes.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret.clone(),
    });

    let protected = supplier_read_routes()
        .merge(supplier_name_routes())
        .merge(supplier_registry_routes())
        .merge(declaration_routes())
        .merge(agreement_view_routes())
        .merge(agreement_signing_routes())
        .merge(service_read_routes())
        .merge(service_toggle_routes())
        .merge(draft_routes())
        .merge(user_read_routes())
        .merge(user_admin_routes())
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    let public = Router::new()
        .route("/healthz", get(health_check))
        .route(
            "/admin/openapi.json",
            get(|| async { Json(crate::api_doc::openapi()) }),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    let docs: Router<Arc<AppState>> = utoipa_rapidoc::RapiDoc::new("/admin/openapi.json")
        .path("/docs")
        .into();

    let app = public
        .merge(protected)
        .merge(docs)
        .layer(ConcurrencyLimitLayer::new(1024))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn supplier_read_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/suppliers", API_PREFIX),
            get(handlers::suppliers::search_suppliers),
        )
        .route(
            &format!("{}/suppliers/{{supplier_id}}", API_PREFIX),
            get(handlers::suppliers::get_supplier),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(ALL_ROLES),
            require_roles,
        ))
}

fn supplier_name_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/suppliers/{{supplier_id}}/name", API_PREFIX),
            post(handlers::suppliers::update_supplier_name),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[
                AdminRole::Admin,
                AdminRole::CategoryManager,
                AdminRole::DataController,
            ]),
            require_roles,
        ))
}

fn supplier_registry_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/suppliers/{{supplier_id}}/registered-name", API_PREFIX),
            post(handlers::suppliers::update_registered_name),
        )
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/registered-address",
                API_PREFIX
            ),
            post(handlers::suppliers::update_registered_address),
        )
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/company-registration-number",
                API_PREFIX
            ),
            post(handlers::suppliers::update_company_number),
        )
        .route(
            &format!("{}/suppliers/{{supplier_id}}/duns-number", API_PREFIX),
            get(handlers::suppliers::get_duns_number),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[AdminRole::DataController]),
            require_roles,
        ))
}

fn declaration_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/frameworks/{{framework_slug}}/declaration",
                API_PREFIX
            ),
            get(handlers::declarations::view_declaration),
        )
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/frameworks/{{framework_slug}}/declaration/sections/{{section_slug}}",
                API_PREFIX
            ),
            get(handlers::declarations::view_declaration_section)
                .post(handlers::declarations::update_declaration_section),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[AdminRole::Sourcing]),
            require_roles,
        ))
}

fn agreement_view_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/frameworks/{{framework_slug}}/agreement",
                API_PREFIX
            ),
            get(handlers::agreements::view_signed_agreement),
        )
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/frameworks/{{framework_slug}}/agreement/download",
                API_PREFIX
            ),
            get(handlers::agreements::download_legacy_agreement),
        )
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/frameworks/{{framework_slug}}/agreements/{{document_name}}",
                API_PREFIX
            ),
            get(handlers::agreements::download_agreement_document),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[
                AdminRole::CategoryManager,
                AdminRole::Sourcing,
                AdminRole::FrameworkManager,
                AdminRole::DataController,
            ]),
            require_roles,
        ))
}

fn agreement_signing_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/agreements/{{agreement_id}}/on-hold", API_PREFIX),
            post(handlers::agreements::put_agreement_on_hold),
        )
        .route(
            &format!("{}/agreements/{{agreement_id}}/approve", API_PREFIX),
            post(handlers::agreements::approve_agreement),
        )
        .route(
            &format!("{}/agreements/{{agreement_id}}/unapprove", API_PREFIX),
            post(handlers::agreements::unapprove_agreement),
        )
        .route(
            &format!(
                "{}/suppliers/{{supplier_id}}/frameworks/{{framework_slug}}/countersigned-agreement",
                API_PREFIX
            ),
            get(handlers::agreements::get_countersigned_agreement)
                .post(handlers::agreements::upload_countersigned_agreement)
                .delete(handlers::agreements::remove_countersigned_agreement),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[AdminRole::Sourcing]),
            require_roles,
        ))
}

fn service_read_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/suppliers/{{supplier_id}}/services", API_PREFIX),
            get(handlers::services::list_services),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[
                AdminRole::Admin,
                AdminRole::CategoryManager,
                AdminRole::FrameworkManager,
                AdminRole::DataController,
            ]),
            require_roles,
        ))
}

fn service_toggle_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/suppliers/{{supplier_id}}/services/toggle", API_PREFIX),
            post(handlers::services::toggle_services),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[AdminRole::CategoryManager]),
            require_roles,
        ))
}

fn draft_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/suppliers/{{supplier_id}}/draft-services", API_PREFIX),
            get(handlers::drafts::list_draft_services),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[AdminRole::FrameworkManager, AdminRole::Sourcing]),
            require_roles,
        ))
}

fn user_read_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/suppliers/{{supplier_id}}/users", API_PREFIX),
            get(handlers::users::list_users),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[
                AdminRole::Admin,
                AdminRole::CategoryManager,
                AdminRole::FrameworkManager,
                AdminRole::DataController,
            ]),
            require_roles,
        ))
}

fn user_admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/users/{{user_id}}/unlock", API_PREFIX),
            post(handlers::users::unlock_user),
        )
        .route(
            &format!("{}/users/{{user_id}}/activate", API_PREFIX),
            post(handlers::users::activate_user),
        )
        .route(
            &format!("{}/suppliers/{{supplier_id}}/users/move", API_PREFIX),
            post(handlers::users::move_user),
        )
        .route(
            &format!("{}/suppliers/{{supplier_id}}/users/invite", API_PREFIX),
            post(handlers::users::invite_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            roles(&[AdminRole::Admin, AdminRole::CategoryManager]),
            require_roles,
        ))
}
