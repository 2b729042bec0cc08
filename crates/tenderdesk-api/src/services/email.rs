//! Email service for sending supplier user invitations via SMTP.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use tenderdesk_core::{AppError, Config};

const INVITE_TOKEN_TTL_DAYS: i64 = 7;

/// Claims embedded in a supplier invitation link. The frontend exchanges the
/// token for an account-creation form scoped to the right supplier.
#[derive(Debug, Serialize, Deserialize)]
pub struct InviteClaims {
    pub email: String,
    pub supplier_id: i64,
    pub supplier_name: String,
    pub exp: i64,
    pub iat: i64,
}

/// No-op if invites are disabled or SMTP is not configured.
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    jwt_secret: String,
    frontend_url: String,
}

impl EmailService {
    /// Create email service from config. Returns `None` if invites are
    /// disabled or SMTP is not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.invites_enabled {
            tracing::debug!("Supplier invites disabled (INVITES_ENABLED=false)");
            return None;
        }
        let host = config.smtp_host.as_deref()?;
        let from = config.smtp_from.clone()?;
        let frontend_url = config.frontend_url.clone()?;
        let port = config.smtp_port.unwrap_or(587);

        let mailer = if config.smtp_tls {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?;
            let b = b.port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(
                host = %host,
                port = port,
                "Email service initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
            jwt_secret: config.jwt_secret.clone(),
            frontend_url,
        })
    }

    fn invite_token(&self, email: &str, supplier_id: i64, supplier_name: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = InviteClaims {
            email: email.to_string(),
            supplier_id,
            supplier_name: supplier_name.to_string(),
            exp: (now + Duration::days(INVITE_TOKEN_TTL_DAYS)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalWithSource {
            message: "Failed to sign invite token".to_string(),
            source: anyhow::Error::new(e),
        })
    }

    /// Send an account-creation invitation to a prospective supplier user.
    pub async fn send_invite(
        &self,
        email: &str,
        supplier_id: i64,
        supplier_name: &str,
    ) -> Result<(), AppError> {
        let token = self.invite_token(email, supplier_id, supplier_name)?;
        let link = format!(
            "{}/create-user/{}",
            self.frontend_url.trim_end_matches('/'),
            token
        );

        let to_addr: Mailbox = email
            .parse()
            .map_err(|_| AppError::InvalidInput("Invalid email address".to_string()))?;
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|_| AppError::Internal("Invalid SMTP_FROM address".to_string()))?;

        let body = format!(
            "You have been invited to create an account for {supplier_name}.\n\n\
             Follow this link to set up your account:\n{link}\n\n\
             The link expires in {INVITE_TOKEN_TTL_DAYS} days."
        );

        let message = Message::builder()
            .from(from_addr)
            .to(to_addr)
            .subject(format!("Create your {supplier_name} account"))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::InternalWithSource {
                message: "Failed to build invite email".to_string(),
                source: anyhow::Error::new(e),
            })?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| AppError::InternalWithSource {
                message: "Failed to send invite email".to_string(),
                source: anyhow::Error::new(e),
            })?;

        info!(supplier_id, "Invitation email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_returns_none_when_invites_disabled() {
        let mut config = Config::for_tests();
        config.invites_enabled = false;
        assert!(EmailService::from_config(&config).is_none());
    }

    #[test]
    fn from_config_returns_none_without_smtp_host() {
        let mut config = Config::for_tests();
        config.invites_enabled = true;
        config.smtp_host = None;
        assert!(EmailService::from_config(&config).is_none());
    }
}
