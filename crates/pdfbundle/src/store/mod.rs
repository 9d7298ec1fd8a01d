//! Blob storage for uploaded files and merged artifacts.
//!
//! Every component reads and writes through a [`BlobStore`]. Blobs are
//! addressed by [`BlobKey`]s; a key prefix acts as a namespace, so a session's
//! files live under `uploaded_files/<session-id>/...` and merged PDFs under
//! `combined_pdfs/<name>`.
//!
//! Two implementations are provided:
//!
//! - [`FsBlobStore`] maps keys onto a directory tree
//! - [`MemoryBlobStore`] keeps everything in a map, for tests and fuzzing
//!
//! # Examples
//!
//! ```no_run
//! use pdfbundle::store::{BlobKey, BlobStore, FsBlobStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FsBlobStore::new("data");
//! let key = BlobKey::new("combined_pdfs/combined.pdf")?;
//! store.put(&key, b"%PDF-1.5".to_vec()).await?;
//! assert!(store.exists(&key).await);
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod key;
pub mod memory;

pub use fs::FsBlobStore;
pub use key::BlobKey;
pub use memory::MemoryBlobStore;

use std::future::Future;

use crate::error::Result;

/// Persistence capability used by every component.
///
/// Implementations must make [`put`](BlobStore::put) atomic: a concurrent
/// reader sees either the previous content or the new content, never a
/// partial write.
pub trait BlobStore: Send + Sync + 'static {
    /// Store `bytes` under `key`, replacing any existing blob.
    fn put(&self, key: &BlobKey, bytes: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::NotFound`](crate::PdfBundleError::NotFound)
    /// if no blob exists under `key`.
    fn get(&self, key: &BlobKey) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Remove the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::NotFound`](crate::PdfBundleError::NotFound)
    /// if no blob exists under `key`.
    fn delete(&self, key: &BlobKey) -> impl Future<Output = Result<()>> + Send;

    /// Whether a blob exists under `key`.
    fn exists(&self, key: &BlobKey) -> impl Future<Output = bool> + Send;

    /// Size in bytes of the blob under `key`.
    fn size(&self, key: &BlobKey) -> impl Future<Output = Result<u64>> + Send;

    /// Blobs directly inside `namespace`, sorted by key.
    ///
    /// Nested namespaces are not listed. A namespace that does not exist
    /// lists as empty.
    fn list(&self, namespace: &BlobKey) -> impl Future<Output = Result<Vec<BlobKey>>> + Send;

    /// Every blob below `namespace`, at any depth, in traversal order.
    ///
    /// The order is whatever the backing store yields and is not guaranteed
    /// to be stable across platforms.
    fn walk(&self, namespace: &BlobKey) -> impl Future<Output = Result<Vec<BlobKey>>> + Send;
}
