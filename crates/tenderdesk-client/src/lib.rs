//! Typed HTTP client for the procurement platform data API.
//!
//! Provides a reqwest-backed client with Bearer auth, generic GET/POST
//! helpers that surface `404` as a distinguishable `ClientError::NotFound`,
//! and the `ProcurementApi` trait grouping the domain operations. The admin
//! API crate depends on the trait, not the concrete client, so tests can
//! substitute an in-memory implementation.

pub mod api;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

pub use api::{PageLinks, ProcurementApi, SupplierPage, SupplierQuery};

/// Failure modes of a data API call.
///
/// `NotFound` is separated out because several read paths treat a missing
/// resource as an empty default rather than an error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Resource not found")]
    NotFound,

    #[error("Data API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to reach data API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode data API response: {message}")]
    Decode { message: String },
}

/// HTTP client for the procurement data API with Bearer token auth.
#[derive(Clone, Debug)]
pub struct HttpProcurementClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpProcurementClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("Authorization", format!("Bearer {}", self.token))
    }

    async fn read_body<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        serde_json::from_str(&raw).map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })
    }

    /// GET with optional query parameters, deserializing the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let mut request = self.apply_auth(self.client.get(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        Self::read_body(response).await
    }

    /// POST a JSON body and deserialize the response.
    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        let response = request.send().await?;
        Self::read_body(response).await
    }
}
