//! Disk-backed manifest loader with an in-process cache.
//!
//! Manifests live at `{root}/{framework_slug}/{kind}.json`. A missing file
//! is a distinguishable `ContentError::NotFound`: callers treat it as "this
//! framework has no such manifest" rather than a failure.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::manifest::Manifest;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("No manifest '{kind}' for framework '{framework_slug}'")]
    NotFound {
        framework_slug: String,
        kind: String,
    },

    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads and caches framework manifests.
pub struct ContentLoader {
    root: PathBuf,
    cache: RwLock<HashMap<(String, String), Arc<Manifest>>>,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ContentLoader {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load the manifest of the given kind for a framework, from cache if
    /// previously loaded.
    pub fn get_manifest(
        &self,
        framework_slug: &str,
        kind: &str,
    ) -> Result<Arc<Manifest>, ContentError> {
        let cache_key = (framework_slug.to_string(), kind.to_string());
        if let Some(manifest) = self
            .cache
            .read()
            .expect("manifest cache lock poisoned")
            .get(&cache_key)
        {
            return Ok(manifest.clone());
        }

        let path = self.root.join(framework_slug).join(format!("{}.json", kind));
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentError::NotFound {
                    framework_slug: framework_slug.to_string(),
                    kind: kind.to_string(),
                });
            }
            Err(e) => return Err(ContentError::Io(e)),
        };

        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|source| ContentError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        let manifest = Arc::new(manifest);

        self.cache
            .write()
            .expect("manifest cache lock poisoned")
            .insert(cache_key, manifest.clone());
        tracing::debug!(framework_slug, kind, "Manifest loaded");
        Ok(manifest)
    }
}
