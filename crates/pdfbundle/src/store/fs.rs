//! Filesystem-backed blob store.
//!
//! Keys map onto paths below a root directory. Writes go to a uniquely named
//! temporary sibling first and are renamed into place, so a blob is never
//! observed half-written.

use std::io;
use std::path::{Path, PathBuf};

use tokio::task;
use tracing::{debug, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{PdfBundleError, Result};
use crate::store::{BlobKey, BlobStore};

/// Suffix of in-flight temporary files. Such files are never listed.
const TEMP_SUFFIX: &str = ".pdfbundle-tmp";

/// Blob store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of a key.
    pub fn path_for(&self, key: &BlobKey) -> PathBuf {
        key.to_path(&self.root)
    }

    fn is_temp_name(name: &str) -> bool {
        name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
    }

    fn map_missing(key: &BlobKey, err: io::Error) -> PdfBundleError {
        if err.kind() == io::ErrorKind::NotFound {
            PdfBundleError::not_found(key.clone())
        } else {
            PdfBundleError::storage(key.clone(), err)
        }
    }

    async fn is_file(&self, key: &BlobKey) -> bool {
        tokio::fs::metadata(self.path_for(key))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}

impl BlobStore for FsBlobStore {
    async fn put(&self, key: &BlobKey, bytes: Vec<u8>) -> Result<()> {
        let path = self.path_for(key);
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| PdfBundleError::storage(key.clone(), e))?;

        // Fixed-length name so long keys still fit the filename limit.
        let temp_path = parent.join(format!(".{}{}", Uuid::new_v4().simple(), TEMP_SUFFIX));

        let size = bytes.len();
        if let Err(e) = tokio::fs::write(&temp_path, bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(PdfBundleError::storage(key.clone(), e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(PdfBundleError::storage(key.clone(), e));
        }

        debug!(key = %key, size, "stored blob");
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>> {
        if !self.is_file(key).await {
            return Err(PdfBundleError::not_found(key.clone()));
        }
        tokio::fs::read(self.path_for(key))
            .await
            .map_err(|e| Self::map_missing(key, e))
    }

    async fn delete(&self, key: &BlobKey) -> Result<()> {
        if !self.is_file(key).await {
            return Err(PdfBundleError::not_found(key.clone()));
        }
        tokio::fs::remove_file(self.path_for(key))
            .await
            .map_err(|e| Self::map_missing(key, e))?;
        debug!(key = %key, "deleted blob");
        Ok(())
    }

    async fn exists(&self, key: &BlobKey) -> bool {
        self.is_file(key).await
    }

    async fn size(&self, key: &BlobKey) -> Result<u64> {
        let metadata = tokio::fs::metadata(self.path_for(key))
            .await
            .map_err(|e| Self::map_missing(key, e))?;
        if !metadata.is_file() {
            return Err(PdfBundleError::not_found(key.clone()));
        }
        Ok(metadata.len())
    }

    async fn list(&self, namespace: &BlobKey) -> Result<Vec<BlobKey>> {
        let dir = self.path_for(namespace);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PdfBundleError::storage(namespace.clone(), e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PdfBundleError::storage(namespace.clone(), e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| PdfBundleError::storage(namespace.clone(), e))?;
            if !file_type.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if Self::is_temp_name(name) {
                continue;
            }
            match namespace.join(name) {
                Ok(key) => keys.push(key),
                Err(e) => warn!(name, error = %e, "skipping unaddressable file"),
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn walk(&self, namespace: &BlobKey) -> Result<Vec<BlobKey>> {
        let dir = self.path_for(namespace);
        match tokio::fs::metadata(&dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Ok(Vec::new()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PdfBundleError::storage(namespace.clone(), e)),
        }

        let root = self.root.clone();
        let ns = namespace.clone();

        task::spawn_blocking(move || {
            let mut keys = Vec::new();
            for entry in WalkDir::new(&dir).min_depth(1) {
                let entry = entry.map_err(|e| {
                    PdfBundleError::storage(ns.clone(), io::Error::other(e.to_string()))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy();
                if Self::is_temp_name(&name) {
                    continue;
                }

                let relative = match entry.path().strip_prefix(&root) {
                    Ok(relative) => relative,
                    Err(_) => continue,
                };
                match BlobKey::from_relative_path(relative) {
                    Ok(key) => keys.push(key),
                    Err(e) => {
                        warn!(path = %entry.path().display(), error = %e, "skipping unaddressable file")
                    }
                }
            }
            Ok::<_, PdfBundleError>(keys)
        })
        .await
        .map_err(|e| PdfBundleError::other(format!("Walk task failed: {e}")))?
    }
}
