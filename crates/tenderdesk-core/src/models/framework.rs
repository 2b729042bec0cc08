use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Framework lifecycle status. The derive order matters: statuses are
/// ordered by lifecycle position (`Coming < Open < ... < Expired`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkStatus {
    Coming,
    Open,
    Pending,
    Standstill,
    Live,
    Expired,
}

impl FrameworkStatus {
    /// Whether a supplier declaration for this framework may be edited.
    pub fn declaration_editable(&self) -> bool {
        matches!(
            self,
            FrameworkStatus::Pending | FrameworkStatus::Standstill | FrameworkStatus::Live
        )
    }

    /// Whether a supplier declaration for this framework may be viewed.
    /// Expired frameworks stay viewable after the edit window closes.
    pub fn declaration_viewable(&self) -> bool {
        self.declaration_editable() || *self == FrameworkStatus::Expired
    }
}

impl std::fmt::Display for FrameworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FrameworkStatus::Coming => "coming",
            FrameworkStatus::Open => "open",
            FrameworkStatus::Pending => "pending",
            FrameworkStatus::Standstill => "standstill",
            FrameworkStatus::Live => "live",
            FrameworkStatus::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}

/// A time-bounded procurement round suppliers apply to join.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Framework {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub status: FrameworkStatus,
    /// Digital ("e-signature") signing flow; false means the legacy
    /// paper/file-based flow.
    #[serde(rename = "isESignatureSupported", default)]
    pub e_signature_supported: bool,
    #[serde(default)]
    pub framework_agreement_version: Option<String>,
    #[serde(default)]
    pub framework_live_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lifecycle_ordering() {
        assert!(FrameworkStatus::Coming < FrameworkStatus::Open);
        assert!(FrameworkStatus::Open < FrameworkStatus::Pending);
        assert!(FrameworkStatus::Standstill < FrameworkStatus::Live);
        assert!(FrameworkStatus::Live < FrameworkStatus::Expired);
    }

    #[test]
    fn test_declaration_edit_window() {
        assert!(FrameworkStatus::Pending.declaration_editable());
        assert!(FrameworkStatus::Standstill.declaration_editable());
        assert!(FrameworkStatus::Live.declaration_editable());
        assert!(!FrameworkStatus::Open.declaration_editable());
        assert!(!FrameworkStatus::Expired.declaration_editable());
        // Viewing additionally allows expired.
        assert!(FrameworkStatus::Expired.declaration_viewable());
        assert!(!FrameworkStatus::Coming.declaration_viewable());
    }

    #[test]
    fn test_framework_wire_format() {
        let json = serde_json::json!({
            "id": 12,
            "slug": "g-cloud-12",
            "name": "G-Cloud 12",
            "status": "live",
            "isESignatureSupported": true,
            "frameworkAgreementVersion": "v2"
        });
        let fw: Framework = serde_json::from_value(json).expect("deserialize");
        assert_eq!(fw.status, FrameworkStatus::Live);
        assert!(fw.e_signature_supported);
        assert_eq!(fw.framework_agreement_version.as_deref(), Some("v2"));
    }
}
