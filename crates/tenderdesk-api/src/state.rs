//! Application state shared across handlers.
//!
//! All durable state lives behind the `ProcurementApi` boundary; the state
//! holds trait objects so tests can substitute in-memory implementations.

use std::sync::Arc;

use tenderdesk_client::ProcurementApi;
use tenderdesk_content::ContentLoader;
use tenderdesk_core::Config;
use tenderdesk_storage::Storage;

use crate::services::email::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn ProcurementApi>,
    pub storage: Arc<dyn Storage>,
    pub content: Arc<ContentLoader>,
    /// None when SMTP is not configured; invites then fail with a clear error.
    pub email: Option<EmailService>,
}

impl AppState {
    pub fn new(
        config: Config,
        api: Arc<dyn ProcurementApi>,
        storage: Arc<dyn Storage>,
        content: Arc<ContentLoader>,
        email: Option<EmailService>,
    ) -> Self {
        AppState {
            config,
            api,
            storage,
            content,
            email,
        }
    }
}
