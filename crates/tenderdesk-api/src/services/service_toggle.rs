//! Bulk suspension and unsuspension of a supplier's services on a
//! framework, plus the grouped services listing behind it.

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use tenderdesk_core::constants::{
    render_message, SUPPLIER_SERVICES_DELAYED_INDEX_MESSAGE,
    SUPPLIER_SERVICES_SUSPENDED_MESSAGE, SUPPLIER_SERVICES_UNSUSPENDED_MESSAGE,
};
use tenderdesk_core::models::{Framework, FrameworkStatus, Service, ServiceStatus};
use tenderdesk_core::AppError;

use crate::auth::AdminContext;
use crate::error::HttpAppError;
use crate::state::AppState;

/// A supplier's services grouped by framework, with the toggle intents that
/// are currently valid for each group.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicesByFramework {
    pub framework_slug: String,
    pub framework_name: String,
    pub framework_status: FrameworkStatus,
    pub services: Vec<Service>,
    /// True when at least one service is published, so suspension applies.
    pub can_suspend: bool,
    /// True when at least one service is disabled, so unsuspension applies.
    pub can_unsuspend: bool,
}

/// Outcome of one service's status change within a toggle batch.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub service_id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a suspend/unsuspend batch.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub supplier_id: i64,
    pub framework_slug: String,
    pub suspended: bool,
    pub outcomes: Vec<ToggleOutcome>,
    pub messages: Vec<String>,
}

/// List a supplier's services grouped by framework. Only live and expired
/// frameworks carry real services.
pub async fn services_by_framework(
    state: &AppState,
    supplier_id: i64,
) -> Result<Vec<ServicesByFramework>, HttpAppError> {
    let frameworks: Vec<Framework> = state
        .api
        .find_frameworks()
        .await?
        .into_iter()
        .filter(|f| f.status >= FrameworkStatus::Live)
        .collect();

    let mut groups = Vec::new();
    for framework in frameworks {
        let services = state
            .api
            .find_services(supplier_id, Some(&framework.slug), None)
            .await?;
        if services.is_empty() {
            continue;
        }
        let can_suspend = services
            .iter()
            .any(|s| s.status == ServiceStatus::Published);
        let can_unsuspend = services
            .iter()
            .any(|s| s.status == ServiceStatus::Disabled);
        groups.push(ServicesByFramework {
            framework_slug: framework.slug,
            framework_name: framework.name,
            framework_status: framework.status,
            services,
            can_suspend,
            can_unsuspend,
        });
    }
    Ok(groups)
}

/// Flip all of a supplier's services on one framework between published and
/// disabled. Non-transactional: each service is updated individually and
/// the result reports the outcome per service.
pub async fn toggle_services(
    state: &AppState,
    admin: &AdminContext,
    supplier_id: i64,
    framework_slug: &str,
    suspend: bool,
) -> Result<ToggleResult, HttpAppError> {
    let framework = state.api.get_framework(framework_slug).await?;
    if framework.status != FrameworkStatus::Live {
        return Err(HttpAppError(AppError::BadRequest(format!(
            "Services can only be suspended or unsuspended on a live framework; '{}' is {}",
            framework.slug, framework.status
        ))));
    }

    let (from_status, to_status) = if suspend {
        (ServiceStatus::Published, ServiceStatus::Disabled)
    } else {
        (ServiceStatus::Disabled, ServiceStatus::Published)
    };

    let services = state
        .api
        .find_services(supplier_id, Some(framework_slug), Some(from_status))
        .await?;
    if services.is_empty() {
        return Err(HttpAppError(AppError::BadRequest(format!(
            "Supplier has no {} services on '{}'",
            from_status, framework.slug
        ))));
    }

    let supplier_name = services[0].supplier_name.clone();

    let mut outcomes = Vec::with_capacity(services.len());
    for service in &services {
        match state
            .api
            .update_service_status(&service.id, to_status, &admin.email)
            .await
        {
            Ok(_) => outcomes.push(ToggleOutcome {
                service_id: service.id.clone(),
                ok: true,
                error: None,
            }),
            Err(e) => {
                warn!(
                    supplier_id,
                    framework_slug,
                    service_id = %service.id,
                    error = %e,
                    "Failed to update service status"
                );
                outcomes.push(ToggleOutcome {
                    service_id: service.id.clone(),
                    ok: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let template = if suspend {
        SUPPLIER_SERVICES_SUSPENDED_MESSAGE
    } else {
        SUPPLIER_SERVICES_UNSUSPENDED_MESSAGE
    };
    let messages = vec![
        render_message(
            template,
            &[
                ("framework_name", framework.name.as_str()),
                ("supplier_name", supplier_name.as_str()),
            ],
        ),
        SUPPLIER_SERVICES_DELAYED_INDEX_MESSAGE.to_string(),
    ];

    info!(
        supplier_id,
        framework_slug,
        suspend,
        updated = outcomes.iter().filter(|o| o.ok).count(),
        failed = outcomes.iter().filter(|o| !o.ok).count(),
        "Service toggle batch finished"
    );

    Ok(ToggleResult {
        supplier_id,
        framework_slug: framework_slug.to_string(),
        suspended: suspend,
        outcomes,
        messages,
    })
}
