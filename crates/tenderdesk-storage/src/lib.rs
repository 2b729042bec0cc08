//! Agreements document storage.
//!
//! Provides the `Storage` trait plus S3 and local filesystem backends, and
//! the document key layout shared by all of them.
//!
//! # Storage key format
//!
//! Documents are namespaced per framework and supplier:
//! `{framework_slug}/{supplier_id}/{category}/{supplier_id}-{document_name}`.
//! Uploaded documents get a timestamp inserted before the extension so
//! earlier uploads are never overwritten. Keys must not contain `..` or a
//! leading `/`. Key generation is centralized in the `keys` module so all
//! backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

pub use factory::create_storage;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use tenderdesk_core::config::StorageBackend;
pub use traits::{SaveOptions, Storage, StorageError, StorageResult, StoredObject};
