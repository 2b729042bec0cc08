use crate::auth::models::{AdminContext, AdminRole, JwtClaims};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tenderdesk_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

fn decode_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 30;
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token has expired".to_string())
        }
        _ => AppError::Unauthorized("Invalid authentication token".to_string()),
    })
}

/// Validates the `Authorization: Bearer` token and stores an [`AdminContext`]
/// in the request extensions for downstream extractors.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!("Request rejected: missing authorization header");
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t.trim(),
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Authorization header must use the Bearer scheme".to_string(),
            ))
            .into_response();
        }
    };

    let claims = match decode_token(token, &auth_state.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Request rejected: token validation failed");
            return HttpAppError(e).into_response();
        }
    };

    let context = AdminContext {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    tracing::debug!(
        admin.user_id = context.user_id,
        admin.role = %context.role,
        "Authenticated admin request"
    );

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Role guard layered per route group. Relies on `auth_middleware` having
/// already stored the [`AdminContext`].
pub async fn require_roles(
    State(allowed): State<Arc<Vec<AdminRole>>>,
    request: Request,
    next: Next,
) -> Response {
    let context = match request.extensions().get::<AdminContext>() {
        Some(ctx) => ctx,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing admin context".to_string(),
            ))
            .into_response();
        }
    };

    if !allowed.contains(&context.role) {
        tracing::warn!(
            admin.user_id = context.user_id,
            admin.role = %context.role,
            path = %request.uri().path(),
            "Role not permitted for route"
        );
        return HttpAppError(AppError::Forbidden(
            "Your role does not have access to this operation".to_string(),
        ))
        .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, role: AdminRole, exp_offset: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: 42,
            email: "admin@example.com".to_string(),
            role,
            exp: now + exp_offset,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let token = make_token("secret", AdminRole::Sourcing, 3600);
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, AdminRole::Sourcing);
    }

    #[test]
    fn test_decode_wrong_secret() {
        let token = make_token("secret", AdminRole::Admin, 3600);
        let err = decode_token(&token, "other").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_decode_expired_token() {
        let token = make_token("secret", AdminRole::Admin, -3600);
        let err = decode_token(&token, "secret").unwrap_err();
        match err {
            AppError::Unauthorized(msg) => assert!(msg.contains("expired")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
