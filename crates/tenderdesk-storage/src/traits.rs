//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tenderdesk_core::config::StorageBackend;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Failed to sign URL: {0}")]
    SigningFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Options applied when saving a document.
///
/// `download_filename` is stored as a `Content-Disposition: attachment`
/// header so browsers save the document under a supplier-specific name
/// rather than the storage key's basename.
#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub content_type: String,
    pub download_filename: Option<String>,
}

impl SaveOptions {
    pub fn pdf() -> Self {
        SaveOptions {
            content_type: "application/pdf".to_string(),
            download_filename: None,
        }
    }

    pub fn with_download_filename(mut self, filename: impl Into<String>) -> Self {
        self.download_filename = Some(filename.into());
        self
    }
}

/// Metadata for a stored document, as returned by `head`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// Handlers work against `Arc<dyn Storage>` and never couple to a specific
/// backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Save a document at the given key, overwriting any existing object.
    async fn save(&self, key: &str, data: Bytes, options: SaveOptions) -> StorageResult<()>;

    /// Fetch metadata for a document. A missing document is `None`, not an
    /// error: callers use this to decide whether a countersigned agreement
    /// has been uploaded yet.
    async fn head(&self, key: &str) -> StorageResult<Option<StoredObject>>;

    /// Check if a document exists.
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.head(key).await?.is_some())
    }

    /// Delete a document by its key. Deleting a missing document is
    /// `StorageError::NotFound`.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Generate a time-limited URL for direct download of a document.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
