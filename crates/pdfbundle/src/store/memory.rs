//! In-memory blob store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{PdfBundleError, Result};
use crate::store::{BlobKey, BlobStore};

/// Blob store holding everything in a sorted map.
///
/// Walk order is key order.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<BTreeMap<BlobKey, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs held.
    pub fn len(&self) -> usize {
        self.blobs().len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs().is_empty()
    }

    fn blobs(&self) -> MutexGuard<'_, BTreeMap<BlobKey, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &BlobKey, bytes: Vec<u8>) -> Result<()> {
        self.blobs().insert(key.clone(), bytes);
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>> {
        self.blobs()
            .get(key)
            .cloned()
            .ok_or_else(|| PdfBundleError::not_found(key.clone()))
    }

    async fn delete(&self, key: &BlobKey) -> Result<()> {
        self.blobs()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| PdfBundleError::not_found(key.clone()))
    }

    async fn exists(&self, key: &BlobKey) -> bool {
        self.blobs().contains_key(key)
    }

    async fn size(&self, key: &BlobKey) -> Result<u64> {
        self.blobs()
            .get(key)
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| PdfBundleError::not_found(key.clone()))
    }

    async fn list(&self, namespace: &BlobKey) -> Result<Vec<BlobKey>> {
        Ok(self
            .blobs()
            .keys()
            .filter(|key| key.parent().as_ref() == Some(namespace))
            .cloned()
            .collect())
    }

    async fn walk(&self, namespace: &BlobKey) -> Result<Vec<BlobKey>> {
        Ok(self
            .blobs()
            .keys()
            .filter(|key| key.strip_prefix(namespace).is_some())
            .cloned()
            .collect())
    }
}
