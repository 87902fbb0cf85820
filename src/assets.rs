//! Asset loading and caching.
//!
//! Meshes, textures and other binary resources are loaded through an
//! [`AssetLoader`] so the engine can be embedded where file system access is
//! virtualized (network fetch, archives). The [`AssetCache`] memoizes loads
//! by path; failures are reported to the logging layer and surface as errors
//! for the caller to decide on — there is no automatic retry.

use crate::errors::StageError;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

/// A trait for abstracting resource access.
pub trait AssetLoader {
    /// Loads the raw bytes of an asset from the given path.
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>>;
}

/// The default implementation of [`AssetLoader`] using `std::fs`.
pub struct DefaultAssetLoader;

impl AssetLoader for DefaultAssetLoader {
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>> {
        if let Ok(bytes) = std::fs::read(path) {
            return Ok(bytes);
        }
        // Fallback to assets/
        let alt = format!("assets/{}", path);
        std::fs::read(&alt).map_err(|e| {
            anyhow::anyhow!(
                "Asset not found: {} (checked '{}' and '{}'): {}",
                path,
                path,
                alt,
                e
            )
        })
    }
}

/// Memoizing byte store keyed by resource path.
pub struct AssetCache {
    loader: Arc<dyn AssetLoader>,
    cache: HashMap<String, Arc<[u8]>>,
}

impl AssetCache {
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            cache: HashMap::new(),
        }
    }

    /// Loads a resource, reusing the cached bytes when the path was seen
    /// before.
    pub fn load(&mut self, path: &str) -> Result<Arc<[u8]>, StageError> {
        if let Some(bytes) = self.cache.get(path) {
            return Ok(Arc::clone(bytes));
        }

        match self.loader.load_bytes(path) {
            Ok(bytes) => {
                let shared: Arc<[u8]> = bytes.into();
                self.cache.insert(path.to_owned(), Arc::clone(&shared));
                Ok(shared)
            }
            Err(err) => {
                error!(path, %err, "asset load failed");
                Err(StageError::AssetNotFound(path.to_owned()))
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.cache.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
