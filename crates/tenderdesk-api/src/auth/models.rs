use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Admin role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AdminRole {
    Admin,
    CategoryManager,
    Sourcing,
    FrameworkManager,
    DataController,
}

impl Display for AdminRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AdminRole::Admin => write!(f, "admin"),
            AdminRole::CategoryManager => write!(f, "category-manager"),
            AdminRole::Sourcing => write!(f, "sourcing"),
            AdminRole::FrameworkManager => write!(f, "framework-manager"),
            AdminRole::DataController => write!(f, "data-controller"),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: i64, // admin user id
    pub email: String,
    pub role: AdminRole,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Admin context extracted from the JWT and stored in request extensions
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub user_id: i64,
    pub email: String,
    pub role: AdminRole,
}

// Implement FromRequestParts for AdminContext to work with Multipart
// Extension cannot be used with Multipart, so we extract directly from request parts
impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Missing admin context".to_string(),
                        details: None,
                        error_type: None,
                        code: "MISSING_ADMIN_CONTEXT".to_string(),
                        recoverable: false,
                        suggested_action: Some("Check authentication token".to_string()),
                    }),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_serde_kebab_case() {
        let role: AdminRole = serde_json::from_str("\"category-manager\"").unwrap();
        assert_eq!(role, AdminRole::CategoryManager);
        assert_eq!(
            serde_json::to_string(&AdminRole::DataController).unwrap(),
            "\"data-controller\""
        );
    }

    #[test]
    fn test_admin_role_display() {
        assert_eq!(AdminRole::FrameworkManager.to_string(), "framework-manager");
        assert_eq!(AdminRole::Admin.to_string(), "admin");
    }
}
