use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Agreement lifecycle status.
///
/// Transitions: `Draft -> Approved`, `Approved <-> OnHold`,
/// `Approved -> Countersigned`. A supplier-framework record with no
/// agreement yet carries no status at all (`Option<AgreementStatus>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AgreementStatus {
    Draft,
    OnHold,
    Approved,
    Countersigned,
}

impl AgreementStatus {
    /// Whether the countersignature step already ran or was approved to run.
    pub fn is_approved_or_countersigned(&self) -> bool {
        matches!(
            self,
            AgreementStatus::Approved | AgreementStatus::Countersigned
        )
    }
}

/// A framework agreement record as returned by agreement transitions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkAgreement {
    pub id: i64,
    pub supplier_id: i64,
    pub framework_slug: String,
    pub status: AgreementStatus,
    #[serde(default)]
    pub countersigned_agreement_path: Option<String>,
    #[serde(default)]
    pub signed_agreement_returned_at: Option<DateTime<Utc>>,
}

/// Partial update for a framework agreement. The countersigned path uses a
/// double Option so it can be explicitly cleared (reference-then-delete
/// ordering relies on writing an explicit null).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countersigned_agreement_path: Option<Option<String>>,
}

impl AgreementUpdate {
    pub fn countersigned_path(path: impl Into<String>) -> Self {
        AgreementUpdate {
            countersigned_agreement_path: Some(Some(path.into())),
        }
    }

    pub fn clear_countersigned_path() -> Self {
        AgreementUpdate {
            countersigned_agreement_path: Some(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(AgreementStatus::OnHold).unwrap(),
            serde_json::json!("on-hold")
        );
        assert_eq!(
            serde_json::to_value(AgreementStatus::Countersigned).unwrap(),
            serde_json::json!("countersigned")
        );
    }

    #[test]
    fn test_approved_or_countersigned() {
        assert!(AgreementStatus::Approved.is_approved_or_countersigned());
        assert!(AgreementStatus::Countersigned.is_approved_or_countersigned());
        assert!(!AgreementStatus::Draft.is_approved_or_countersigned());
        assert!(!AgreementStatus::OnHold.is_approved_or_countersigned());
    }

    #[test]
    fn test_clear_countersigned_path_serializes_null() {
        let update = AgreementUpdate::clear_countersigned_path();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json["countersignedAgreementPath"],
            serde_json::Value::Null
        );
    }
}
