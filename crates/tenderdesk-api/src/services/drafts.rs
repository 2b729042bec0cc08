//! Draft-service listings annotated with completeness counts.

use serde::Serialize;
use utoipa::ToSchema;

use tenderdesk_content::{count_unanswered_questions, ContentError};
use tenderdesk_core::constants::EDIT_SERVICE_AS_ADMIN_MANIFEST;
use tenderdesk_core::models::{DraftService, FrameworkStatus};

use crate::auth::{AdminContext, AdminRole};
use crate::error::HttpAppError;
use crate::state::AppState;

/// A draft service with its required-question completeness annotation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedDraft {
    #[serde(flatten)]
    pub draft: DraftService,
    pub unanswered_required_count: usize,
    pub unanswered_optional_count: usize,
}

/// Draft services grouped per framework.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftsByFramework {
    pub framework_slug: String,
    pub framework_name: String,
    pub drafts: Vec<AnnotatedDraft>,
}

/// Which framework statuses a role may see drafts for.
fn visible_statuses(role: AdminRole) -> &'static [FrameworkStatus] {
    match role {
        AdminRole::FrameworkManager => &[
            FrameworkStatus::Open,
            FrameworkStatus::Pending,
            FrameworkStatus::Standstill,
            FrameworkStatus::Live,
            FrameworkStatus::Expired,
        ],
        _ => &[
            FrameworkStatus::Pending,
            FrameworkStatus::Standstill,
            FrameworkStatus::Live,
            FrameworkStatus::Expired,
        ],
    }
}

/// List a supplier's draft services per framework, each draft annotated
/// with its unanswered-question counts. Frameworks without a service-edit
/// manifest are omitted entirely.
pub async fn drafts_by_framework(
    state: &AppState,
    admin: &AdminContext,
    supplier_id: i64,
) -> Result<Vec<DraftsByFramework>, HttpAppError> {
    let statuses = visible_statuses(admin.role);
    let mut frameworks: Vec<_> = state
        .api
        .find_frameworks()
        .await?
        .into_iter()
        .filter(|f| statuses.contains(&f.status))
        .collect();
    frameworks.sort_by(|a, b| a.slug.cmp(&b.slug));

    let mut groups = Vec::new();
    for framework in frameworks {
        let manifest = match state
            .content
            .get_manifest(&framework.slug, EDIT_SERVICE_AS_ADMIN_MANIFEST)
        {
            Ok(manifest) => manifest,
            Err(ContentError::NotFound { .. }) => continue,
            Err(e) => return Err(e.into()),
        };

        let mut drafts = state
            .api
            .find_draft_services(supplier_id, Some(&framework.slug))
            .await?;
        if drafts.is_empty() {
            continue;
        }
        drafts.sort_by_key(|d| d.created_at);

        let annotated = drafts
            .into_iter()
            .map(|draft| {
                let filtered = manifest.filter(&draft.answers);
                let (required, optional) = count_unanswered_questions(&filtered, &draft.answers);
                AnnotatedDraft {
                    draft,
                    unanswered_required_count: required,
                    unanswered_optional_count: optional,
                }
            })
            .collect();

        groups.push(DraftsByFramework {
            framework_slug: framework.slug,
            framework_name: framework.name,
            drafts: annotated,
        });
    }
    Ok(groups)
}
