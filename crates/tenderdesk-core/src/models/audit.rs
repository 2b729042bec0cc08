use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Audit event categories recorded against the procurement API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditType {
    UploadCountersignedAgreement,
    DeleteCountersignedAgreement,
    InviteUser,
}

/// An audit event to record: who did what to which object.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub audit_type: AuditType,
    /// Email address of the acting admin.
    pub user: String,
    pub object_type: String,
    pub object_id: i64,
    pub data: serde_json::Value,
}

impl AuditEvent {
    pub fn for_supplier(
        audit_type: AuditType,
        user: impl Into<String>,
        supplier_id: i64,
        data: serde_json::Value,
    ) -> Self {
        AuditEvent {
            audit_type,
            user: user.into(),
            object_type: "suppliers".to_string(),
            object_id: supplier_id,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_type_wire_names() {
        assert_eq!(
            serde_json::to_value(AuditType::UploadCountersignedAgreement).unwrap(),
            serde_json::json!("upload_countersigned_agreement")
        );
        assert_eq!(
            serde_json::to_value(AuditType::InviteUser).unwrap(),
            serde_json::json!("invite_user")
        );
    }
}
