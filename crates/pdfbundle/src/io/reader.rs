//! PDF decoding.
//!
//! Loads PDF documents from stored bytes with:
//! - Parsing off the async runtime
//! - Rejection of documents without pages
//! - Encryption detection

use lopdf::Document;
use std::time::Instant;
use tokio::task;
use tracing::debug;

use crate::error::{PdfBundleError, Result};
use crate::store::{BlobKey, BlobStore};

/// A decoded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Key the document was loaded from.
    pub key: BlobKey,

    /// Size of the encoded document in bytes.
    pub file_size: u64,
}

/// Decodes stored PDFs.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Fetch and decode the PDF stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key does not exist in the store
    /// - The bytes are not a valid PDF
    /// - The PDF is encrypted
    /// - The PDF has no pages
    pub async fn load<S: BlobStore>(&self, store: &S, key: &BlobKey) -> Result<LoadedPdf> {
        let bytes = store.get(key).await?;
        self.load_bytes(key, bytes).await
    }

    /// Decode PDF bytes that were read from `key`.
    ///
    /// `key` is only used to label errors and the result.
    pub async fn load_bytes(&self, key: &BlobKey, bytes: Vec<u8>) -> Result<LoadedPdf> {
        let key = key.clone();

        task::spawn_blocking(move || {
            let start = Instant::now();
            let file_size = bytes.len() as u64;

            let document = Document::load_mem(&bytes).map_err(|e| {
                let err_msg = e.to_string();
                if err_msg.contains("encrypt") || err_msg.contains("password") {
                    PdfBundleError::unreadable_pdf(key.clone(), "PDF is encrypted")
                } else {
                    PdfBundleError::unreadable_pdf(key.clone(), err_msg)
                }
            })?;

            if document.trailer.get(b"Encrypt").is_ok() {
                return Err(PdfBundleError::unreadable_pdf(key, "PDF is encrypted"));
            }

            let page_count = document.get_pages().len();
            if page_count == 0 {
                return Err(PdfBundleError::unreadable_pdf(key, "PDF has no pages"));
            }

            let load_time = start.elapsed();
            debug!(key = %key, pages = page_count, ?load_time, "loaded pdf");

            Ok(LoadedPdf {
                document,
                key,
                file_size,
            })
        })
        .await
        .map_err(|e| PdfBundleError::other(format!("Load task failed: {e}")))?
    }
}
