//! Configuration module
//!
//! Environment-driven configuration for the admin API service: server,
//! authentication, the remote procurement API, agreements document storage,
//! content manifests, and SMTP for user invitations.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 1800;
const DEFAULT_OLDEST_INTERESTING_FRAMEWORK: &str = "g-cloud-7";

/// Storage backend selection for the agreements bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    // Remote procurement API
    pub api_base_url: String,
    pub api_token: String,
    // Content manifests
    pub content_root: String,
    // Agreements document storage
    pub storage_backend: StorageBackend,
    pub agreements_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub local_storage_path: Option<String>,
    pub assets_base_url: String,
    pub signed_url_expiry_secs: u64,
    // Framework visibility
    pub oldest_interesting_framework_slug: String,
    pub deprecated_framework_slugs: Vec<String>,
    // Email (user invitations)
    pub invites_enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
    pub frontend_url: Option<String>,
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env_string(key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `JWT_SECRET`, `PROCUREMENT_API_URL`, `PROCUREMENT_API_TOKEN`.
    /// Storage defaults to the local backend under `./agreements-data` unless
    /// `AGREEMENTS_BUCKET` is set, in which case S3 is used.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        let api_base_url = env::var("PROCUREMENT_API_URL")
            .map_err(|_| anyhow::anyhow!("PROCUREMENT_API_URL environment variable is required"))?;
        let api_token = env::var("PROCUREMENT_API_TOKEN").map_err(|_| {
            anyhow::anyhow!("PROCUREMENT_API_TOKEN environment variable is required")
        })?;

        let agreements_bucket = env_opt("AGREEMENTS_BUCKET");
        let storage_backend = match env_opt("STORAGE_BACKEND").as_deref() {
            Some("s3") => StorageBackend::S3,
            Some("local") => StorageBackend::Local,
            Some(other) => {
                return Err(anyhow::anyhow!("Unknown STORAGE_BACKEND: {}", other));
            }
            None => {
                if agreements_bucket.is_some() {
                    StorageBackend::S3
                } else {
                    StorageBackend::Local
                }
            }
        };

        if storage_backend == StorageBackend::S3 && agreements_bucket.is_none() {
            return Err(anyhow::anyhow!(
                "AGREEMENTS_BUCKET is required for the s3 storage backend"
            ));
        }

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            environment: env_string("ENVIRONMENT", "development"),
            jwt_secret,
            api_base_url,
            api_token,
            content_root: env_string("CONTENT_ROOT", "content"),
            storage_backend,
            agreements_bucket,
            s3_region: env_opt("S3_REGION"),
            s3_endpoint: env_opt("S3_ENDPOINT_URL"),
            local_storage_path: Some(env_string("LOCAL_STORAGE_PATH", "agreements-data")),
            assets_base_url: env_string("ASSETS_BASE_URL", "https://assets.example.com"),
            signed_url_expiry_secs: env_parse(
                "SIGNED_URL_EXPIRY_SECS",
                DEFAULT_SIGNED_URL_EXPIRY_SECS,
            ),
            oldest_interesting_framework_slug: env_string(
                "OLDEST_INTERESTING_FRAMEWORK_SLUG",
                DEFAULT_OLDEST_INTERESTING_FRAMEWORK,
            ),
            deprecated_framework_slugs: env_list("DEPRECATED_FRAMEWORK_SLUGS", ""),
            invites_enabled: env_bool("INVITES_ENABLED", false),
            smtp_host: env_opt("SMTP_HOST"),
            smtp_port: env_opt("SMTP_PORT").and_then(|s| s.parse().ok()),
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASSWORD"),
            smtp_from: env_opt("SMTP_FROM"),
            smtp_tls: env_bool("SMTP_TLS", true),
            frontend_url: env_opt("FRONTEND_URL"),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Fixed configuration for tests, independent of the environment.
    pub fn for_tests() -> Config {
        Config {
            server_port: 3000,
            environment: "development".to_string(),
            jwt_secret: "secret".to_string(),
            api_base_url: "http://localhost:5000".to_string(),
            api_token: "token".to_string(),
            content_root: "content".to_string(),
            storage_backend: StorageBackend::Local,
            agreements_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some("agreements-data".to_string()),
            assets_base_url: "https://assets.example.com".to_string(),
            signed_url_expiry_secs: 1800,
            oldest_interesting_framework_slug: "g-cloud-7".to_string(),
            deprecated_framework_slugs: vec![],
            invites_enabled: false,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: true,
            frontend_url: None,
        }
    }
}
