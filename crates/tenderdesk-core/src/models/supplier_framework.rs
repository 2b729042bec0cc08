use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::agreement::AgreementStatus;

/// A supplier's self-certified answers to a framework's eligibility
/// questionnaire: question id -> answer. Stored and persisted whole.
pub type Declaration = BTreeMap<String, serde_json::Value>;

/// A supplier's interest record for one framework: the outcome, agreement
/// state, document locations, and the declaration mapping.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierFramework {
    pub supplier_id: i64,
    pub framework_slug: String,
    #[serde(default)]
    pub on_framework: bool,
    #[serde(default)]
    pub agreement_id: Option<i64>,
    #[serde(default)]
    pub agreement_returned: bool,
    #[serde(default)]
    pub agreement_status: Option<AgreementStatus>,
    #[serde(default)]
    pub agreement_path: Option<String>,
    #[serde(default)]
    pub countersigned_path: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub declaration: Declaration,
}

impl SupplierFramework {
    /// An agreement is only manageable (countersigning, uploads) once the
    /// supplier is on the framework and the agreement has moved past draft.
    pub fn agreement_manageable(&self) -> bool {
        self.on_framework
            && !matches!(self.agreement_status, None | Some(AgreementStatus::Draft))
    }

    /// The supplier's display name from the declaration, if declared.
    pub fn declared_organisation_name(&self) -> Option<&str> {
        self.declaration
            .get("nameOfOrganisation")
            .and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SupplierFramework {
        SupplierFramework {
            supplier_id: 1,
            framework_slug: "g-cloud-12".to_string(),
            on_framework: true,
            agreement_id: Some(99),
            agreement_returned: true,
            agreement_status: Some(AgreementStatus::Approved),
            agreement_path: None,
            countersigned_path: None,
            declaration: Declaration::new(),
        }
    }

    #[test]
    fn test_agreement_manageable() {
        assert!(base().agreement_manageable());

        let mut sf = base();
        sf.agreement_status = Some(AgreementStatus::Draft);
        assert!(!sf.agreement_manageable());

        let mut sf = base();
        sf.agreement_status = None;
        assert!(!sf.agreement_manageable());

        let mut sf = base();
        sf.on_framework = false;
        assert!(!sf.agreement_manageable());
    }

    #[test]
    fn test_declared_organisation_name() {
        let mut sf = base();
        assert!(sf.declared_organisation_name().is_none());
        sf.declaration.insert(
            "nameOfOrganisation".to_string(),
            serde_json::json!("Acme Ltd"),
        );
        assert_eq!(sf.declared_organisation_name(), Some("Acme Ltd"));
    }

    #[test]
    fn test_missing_fields_default() {
        let json = serde_json::json!({
            "supplierId": 7,
            "frameworkSlug": "g-cloud-12"
        });
        let sf: SupplierFramework = serde_json::from_value(json).expect("deserialize");
        assert!(!sf.on_framework);
        assert!(sf.agreement_status.is_none());
        assert!(sf.declaration.is_empty());
    }
}
