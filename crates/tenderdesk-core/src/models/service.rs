use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a published or draft service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    Published,
    Disabled,
    Enabled,
    Submitted,
    NotSubmitted,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceStatus::Published => "published",
            ServiceStatus::Disabled => "disabled",
            ServiceStatus::Enabled => "enabled",
            ServiceStatus::Submitted => "submitted",
            ServiceStatus::NotSubmitted => "not-submitted",
        };
        write!(f, "{}", s)
    }
}

/// A supplier's service published (or suspended) under a framework.
/// Service ids are opaque numeric strings issued by the procurement API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub supplier_id: i64,
    pub supplier_name: String,
    pub framework_slug: String,
    pub framework_name: String,
    pub lot_name: String,
    pub status: ServiceStatus,
}

/// An unsubmitted draft service, carrying its in-progress answers inline so
/// they can be filtered against the service-edit manifest.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftService {
    pub id: i64,
    pub supplier_id: i64,
    pub framework_slug: String,
    pub lot_name: String,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten, default)]
    #[schema(value_type = Object)]
    pub answers: BTreeMap<String, serde_json::Value>,
}
