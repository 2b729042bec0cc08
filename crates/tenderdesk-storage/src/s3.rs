//! S3 storage backend built on `object_store`.

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload};
use std::time::Duration;

use tenderdesk_core::config::StorageBackend;

use crate::traits::{SaveOptions, Storage, StorageError, StorageResult, StoredObject};

/// S3-backed agreements store.
///
/// When `assets_base_url` is set, signed URLs are rewritten to point at the
/// assets host (a CDN in front of the bucket) while keeping the signature
/// query string intact.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    assets_base_url: Option<String>,
}

impl S3Storage {
    pub fn new(
        bucket: String,
        region: Option<String>,
        endpoint: Option<String>,
        assets_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket.clone());
        if let Some(region) = region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder.build().map_err(|e| {
            StorageError::ConfigError(format!("Failed to build S3 object store: {}", e))
        })?;

        Ok(S3Storage {
            store,
            bucket,
            assets_base_url: assets_base_url.map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl Storage for S3Storage {
    #[tracing::instrument(skip(self, data), fields(
        s3.bucket = %self.bucket,
        s3.key = %key,
        s3.size = %data.len()
    ))]
    async fn save(&self, key: &str, data: Bytes, options: SaveOptions) -> StorageResult<()> {
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, options.content_type.into());
        if let Some(filename) = options.download_filename {
            attributes.insert(
                Attribute::ContentDisposition,
                format!("attachment; filename=\"{}\"", filename).into(),
            );
        }

        let put_options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.store
            .put_opts(&location, PutPayload::from(data), put_options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "S3 upload failed");
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!("S3 upload successful");
        Ok(())
    }

    async fn head(&self, key: &str) -> StorageResult<Option<StoredObject>> {
        let location = Path::from(key);
        match self.store.head(&location).await {
            Ok(meta) => Ok(Some(StoredObject {
                size: meta.size,
                last_modified: meta.last_modified,
            })),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    #[tracing::instrument(skip(self), fields(s3.bucket = %self.bucket, s3.key = %key))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        let location = Path::from(key);
        match self.store.delete(&location).await {
            Ok(()) => {
                tracing::info!("S3 delete successful");
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, "S3 delete failed");
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key);
        let url = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;

        match &self.assets_base_url {
            Some(assets) => {
                let mut rewritten = format!("{}{}", assets, url.path());
                if let Some(query) = url.query() {
                    rewritten.push('?');
                    rewritten.push_str(query);
                }
                Ok(rewritten)
            }
            None => Ok(url.to_string()),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
