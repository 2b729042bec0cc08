use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A supplier-side user account managed through the admin service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUser {
    pub id: i64,
    pub email_address: String,
    pub name: String,
    pub active: bool,
    pub locked: bool,
    pub role: String,
    #[serde(default)]
    pub supplier_id: Option<i64>,
}

/// Partial update for a user account.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<i64>,
}

impl UserUpdate {
    pub fn unlock() -> Self {
        UserUpdate {
            locked: Some(false),
            ..Default::default()
        }
    }

    pub fn activate(active: bool) -> Self {
        UserUpdate {
            active: Some(active),
            ..Default::default()
        }
    }

    /// Attach a user to a supplier as an active supplier-role user.
    pub fn move_to_supplier(supplier_id: i64) -> Self {
        UserUpdate {
            active: Some(true),
            role: Some("supplier".to_string()),
            supplier_id: Some(supplier_id),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_to_supplier_update() {
        let update = UserUpdate::move_to_supplier(42);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["supplierId"], 42);
        assert_eq!(json["role"], "supplier");
        assert_eq!(json["active"], true);
        assert!(json.get("locked").is_none());
    }
}
