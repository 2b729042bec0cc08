//! Declaration viewing and section-scoped editing.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use tenderdesk_client::ClientError;
use tenderdesk_content::{Answers, FilteredManifest, Question, Section};
use tenderdesk_core::constants::{DECLARATION_MANIFEST, MODERN_SLAVERY_FIELDS};
use tenderdesk_core::models::{Declaration, Framework};
use tenderdesk_core::AppError;

use crate::auth::AdminContext;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Full-declaration view: every visible question with the stored answers,
/// document fields rewritten to public asset URLs.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationView {
    pub supplier_id: i64,
    pub framework_slug: String,
    pub framework_name: String,
    #[schema(value_type = Object)]
    pub declaration: Declaration,
    #[schema(value_type = Object)]
    pub questions: BTreeMap<String, Question>,
}

/// One section of the declaration with its current answers, for editing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationSectionView {
    pub supplier_id: i64,
    pub framework_slug: String,
    #[schema(value_type = Object)]
    pub section: Section,
    #[schema(value_type = Object)]
    pub answers: Answers,
}

/// Result of a section update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationUpdateResult {
    pub supplier_id: i64,
    pub framework_slug: String,
    pub section_slug: String,
    /// False when the posted answers matched the stored ones and no write
    /// was issued.
    pub changed: bool,
    #[schema(value_type = Object)]
    pub declaration: Declaration,
}

/// Resolve the framework, rejecting deprecated slugs with 404 and
/// non-viewable (or, for edits, non-editable) statuses with 403.
async fn framework_for_declaration(
    state: &AppState,
    framework_slug: &str,
    editing: bool,
) -> Result<Framework, HttpAppError> {
    if state
        .config
        .deprecated_framework_slugs
        .iter()
        .any(|s| s == framework_slug)
    {
        return Err(HttpAppError(AppError::NotFound(
            "Framework is no longer available".to_string(),
        )));
    }

    let framework = state.api.get_framework(framework_slug).await?;
    let allowed = if editing {
        framework.status.declaration_editable()
    } else {
        framework.status.declaration_viewable()
    };
    if !allowed {
        return Err(HttpAppError(AppError::Forbidden(format!(
            "Declarations cannot be {} while the framework is {}",
            if editing { "edited" } else { "viewed" },
            framework.status
        ))));
    }
    Ok(framework)
}

/// A supplier with no declaration record yet is shown an empty one.
async fn declaration_or_empty(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
) -> Result<Declaration, HttpAppError> {
    match state
        .api
        .get_supplier_declaration(supplier_id, framework_slug)
        .await
    {
        Ok(declaration) => Ok(declaration),
        Err(ClientError::NotFound) => Ok(Declaration::new()),
        Err(e) => Err(e.into()),
    }
}

fn filtered_manifest(
    state: &AppState,
    framework_slug: &str,
    declaration: &Declaration,
) -> Result<FilteredManifest, HttpAppError> {
    let manifest = state
        .content
        .get_manifest(framework_slug, DECLARATION_MANIFEST)?;
    Ok(manifest.filter(declaration))
}

/// Rewrite modern-slavery document references to public asset URLs. The
/// stored declaration keeps the raw path; only the view is rewritten.
fn rewrite_document_fields(declaration: &mut Declaration, assets_base_url: &str) {
    let base = assets_base_url.trim_end_matches('/');
    for field in MODERN_SLAVERY_FIELDS {
        if let Some(serde_json::Value::String(path)) = declaration.get_mut(field) {
            if !path.starts_with("http://") && !path.starts_with("https://") {
                *path = format!("{}/{}", base, path.trim_start_matches('/'));
            }
        }
    }
}

pub async fn view_declaration(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
) -> Result<DeclarationView, HttpAppError> {
    let framework = framework_for_declaration(state, framework_slug, false).await?;
    let mut declaration = declaration_or_empty(state, supplier_id, framework_slug).await?;
    let filtered = filtered_manifest(state, framework_slug, &declaration)?;
    let questions = filtered.question_index();

    rewrite_document_fields(&mut declaration, &state.config.assets_base_url);

    Ok(DeclarationView {
        supplier_id,
        framework_slug: framework.slug,
        framework_name: framework.name,
        declaration,
        questions,
    })
}

pub async fn view_declaration_section(
    state: &AppState,
    supplier_id: i64,
    framework_slug: &str,
    section_slug: &str,
) -> Result<DeclarationSectionView, HttpAppError> {
    framework_for_declaration(state, framework_slug, true).await?;
    let declaration = declaration_or_empty(state, supplier_id, framework_slug).await?;
    let filtered = filtered_manifest(state, framework_slug, &declaration)?;

    let section = filtered.get_section(section_slug).ok_or_else(|| {
        HttpAppError(AppError::NotFound(format!(
            "Declaration section '{}' not found",
            section_slug
        )))
    })?;

    Ok(DeclarationSectionView {
        supplier_id,
        framework_slug: framework_slug.to_string(),
        answers: section.get_data(&declaration),
        section: section.clone(),
    })
}

/// Apply posted answers to one declaration section. Only answers belonging
/// to the section are taken from the posted mapping; declarations are
/// persisted whole. No write is issued when nothing changed.
pub async fn update_declaration_section(
    state: &AppState,
    admin: &AdminContext,
    supplier_id: i64,
    framework_slug: &str,
    section_slug: &str,
    posted: Answers,
) -> Result<DeclarationUpdateResult, HttpAppError> {
    framework_for_declaration(state, framework_slug, true).await?;
    let mut declaration = declaration_or_empty(state, supplier_id, framework_slug).await?;
    let filtered = filtered_manifest(state, framework_slug, &declaration)?;

    let section = filtered.get_section(section_slug).ok_or_else(|| {
        HttpAppError(AppError::NotFound(format!(
            "Declaration section '{}' not found",
            section_slug
        )))
    })?;

    let new_answers = section.get_data(&posted);
    if !section.has_changes_to_save(&declaration, &new_answers) {
        return Ok(DeclarationUpdateResult {
            supplier_id,
            framework_slug: framework_slug.to_string(),
            section_slug: section_slug.to_string(),
            changed: false,
            declaration,
        });
    }

    declaration.extend(new_answers);
    let declaration = state
        .api
        .set_supplier_declaration(supplier_id, framework_slug, &declaration, &admin.email)
        .await?;

    info!(
        supplier_id,
        framework_slug, section_slug, "Declaration section updated"
    );

    Ok(DeclarationUpdateResult {
        supplier_id,
        framework_slug: framework_slug.to_string(),
        section_slug: section_slug.to_string(),
        changed: true,
        declaration,
    })
}
