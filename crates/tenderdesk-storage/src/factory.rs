use crate::{LocalStorage, S3Storage, Storage, StorageError, StorageResult};
use std::sync::Arc;
use tenderdesk_core::config::StorageBackend;
use tenderdesk_core::Config;

/// Create the agreements storage backend selected by configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let bucket = config.agreements_bucket.clone().ok_or_else(|| {
                StorageError::ConfigError("AGREEMENTS_BUCKET not configured".to_string())
            })?;

            let storage = S3Storage::new(
                bucket,
                config.s3_region.clone(),
                config.s3_endpoint.clone(),
                Some(config.assets_base_url.clone()),
            )?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, config.assets_base_url.clone()).await?;
            Ok(Arc::new(storage))
        }
    }
}
