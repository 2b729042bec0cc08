//! Application setup and initialization.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};

use tenderdesk_client::HttpProcurementClient;
use tenderdesk_content::ContentLoader;
use tenderdesk_core::Config;
use tenderdesk_storage::create_storage;

use crate::services::email::EmailService;
use crate::state::AppState;

/// Initialize the entire application: remote clients, storage, content
/// manifests, state and routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let api = HttpProcurementClient::new(config.api_base_url.clone(), config.api_token.clone())
        .context("Failed to build procurement API client")?;

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize agreements storage")?;

    let content = Arc::new(ContentLoader::new(config.content_root.clone()));

    let email = EmailService::from_config(&config);
    if email.is_none() {
        tracing::info!("Supplier invitations disabled or SMTP not configured");
    }

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(api),
        storage,
        content,
        email,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    tracing::info!(
        environment = %config.environment,
        storage = ?config.storage_backend,
        "Application initialized"
    );

    Ok((state, router))
}
