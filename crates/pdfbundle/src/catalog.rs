//! Listing, opening and deleting stored files.
//!
//! The catalog is the read-mostly view over the blob store:
//! - Direct children of a session namespace
//! - Merged artifacts in the shared combined namespace
//! - Deletion of single files

use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::config::StorageLayout;
use crate::error::Result;
use crate::store::{BlobKey, BlobStore};
use crate::utils::format_file_size;

/// A merged PDF in the combined namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// File name, unique within the combined namespace.
    pub name: String,

    /// Storage key.
    pub key: BlobKey,

    /// Size in bytes.
    pub size: u64,
}

impl Artifact {
    /// Format size as human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.size)
    }
}

/// Read and delete access to stored files and artifacts.
pub struct ArtifactCatalog<S> {
    store: Arc<S>,
    layout: StorageLayout,
}

impl<S: BlobStore> ArtifactCatalog<S> {
    /// Create a catalog over `store` using `layout` to find artifacts.
    pub fn new(store: Arc<S>, layout: StorageLayout) -> Self {
        Self { store, layout }
    }

    /// Files directly inside `namespace`, sorted by key.
    ///
    /// Files in subfolders (such as extracted archives) are not included.
    pub async fn list_session_files(&self, namespace: &BlobKey) -> Result<Vec<BlobKey>> {
        self.store.list(namespace).await
    }

    /// Delete a single file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PdfBundleError::NotFound`] if nothing is stored under
    /// `key`, including when it was already deleted.
    pub async fn delete(&self, key: &BlobKey) -> Result<()> {
        self.store.delete(key).await?;
        info!(key = %key, "deleted file");
        Ok(())
    }

    /// Every merged artifact, sorted by name.
    pub async fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        let keys = self.store.list(&self.layout.combined).await?;

        let sizes = try_join_all(keys.iter().map(|key| self.store.size(key))).await?;

        let mut artifacts: Vec<Artifact> = keys
            .into_iter()
            .zip(sizes)
            .map(|(key, size)| Artifact {
                name: key.file_name().to_string(),
                key,
                size,
            })
            .collect();
        artifacts.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(artifacts)
    }

    /// Bytes of the artifact called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a valid artifact name or no such
    /// artifact exists.
    pub async fn open_artifact(&self, name: &str) -> Result<Vec<u8>> {
        let key = self.layout.artifact_key(name)?;
        self.store.get(&key).await
    }
}
