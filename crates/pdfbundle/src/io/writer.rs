//! PDF serialization and publishing.
//!
//! This module turns a finished document into bytes and stores them:
//! - Stream compression
//! - Object renumbering for a compact cross-reference table
//! - Publishing through the blob store, which replaces the target atomically

use lopdf::Document;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{PdfBundleError, Result};
use crate::store::{BlobKey, BlobStore};
use crate::utils::format_file_size;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to serialize and store the document.
    pub write_time: Duration,

    /// Size of the stored document in bytes.
    pub file_size: u64,

    /// Key the document was stored under.
    pub key: BlobKey,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Serializes finished documents and publishes them.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new PDF writer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize a document to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::MergeFailed`] if lopdf cannot serialize the
    /// document.
    pub async fn encode(&self, document: Document) -> Result<Vec<u8>> {
        let mut document = document;

        task::spawn_blocking(move || {
            document.compress();
            document.renumber_objects();

            let mut bytes = Vec::new();
            document.save_to(&mut bytes).map_err(|e| {
                PdfBundleError::merge_failed(format!("Failed to serialize document: {e}"))
            })?;
            Ok(bytes)
        })
        .await
        .map_err(|e| PdfBundleError::other(format!("Write task failed: {e}")))?
    }

    /// Serialize a document and store it under `key`.
    ///
    /// The store replaces any existing blob atomically, so readers observe
    /// either the previous document or the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the store cannot write.
    pub async fn save<S: BlobStore>(
        &self,
        store: &S,
        key: &BlobKey,
        document: Document,
    ) -> Result<WriteStatistics> {
        let start = Instant::now();

        let bytes = self.encode(document).await?;
        let file_size = bytes.len() as u64;
        store.put(key, bytes).await?;

        let stats = WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            key: key.clone(),
        };
        debug!(
            key = %key,
            size = %stats.format_file_size(),
            write_time = ?stats.write_time,
            "stored pdf"
        );

        Ok(stats)
    }
}
