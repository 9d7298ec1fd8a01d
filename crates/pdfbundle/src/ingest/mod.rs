//! Archive ingestion.
//!
//! This module turns an uploaded ZIP archive into files in a session
//! namespace:
//! - The extraction folder is named after the archive (text before the first `.`)
//! - Every entry is stored below that folder, keeping its internal path
//! - Re-uploading an archive with the same base name extracts into the same folder
//! - PDF and PNG files below a folder are enumerated as selection candidates
//!
//! # Examples
//!
//! ```no_run
//! use pdfbundle::ingest::ArchiveIngestor;
//! use pdfbundle::store::{BlobKey, MemoryBlobStore};
//! use std::sync::Arc;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let ingestor = ArchiveIngestor::new(Arc::new(MemoryBlobStore::new()));
//! let namespace = BlobKey::new("uploaded_files/session")?;
//! let folder = ingestor.extract(bytes, "scans.zip", &namespace).await?;
//! for candidate in ingestor.list_candidates(&folder).await? {
//!     println!("{}", candidate.key);
//! }
//! # Ok(())
//! # }
//! ```

pub mod candidates;

pub use candidates::{CandidateFile, FileKind, filter_candidates};

use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{PdfBundleError, Result};
use crate::store::{BlobKey, BlobStore};
use crate::utils::format_file_size;

/// Upper bound on the up-front buffer reserved per entry.
const MAX_PREALLOC: u64 = 1 << 20;

/// Outcome of extracting one archive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    /// Name the archive was uploaded under.
    pub archive: String,

    /// Folder the entries were extracted into.
    pub folder: BlobKey,

    /// Number of file entries stored.
    pub entries_written: usize,

    /// Number of entries skipped because their path was unsafe.
    pub entries_skipped: usize,

    /// Total decompressed bytes stored.
    pub bytes_written: u64,

    /// Time taken to decompress and store the entries.
    #[serde(skip)]
    pub extract_time: Duration,
}

impl ExtractionReport {
    /// Format the decompressed size as human-readable string.
    pub fn format_bytes_written(&self) -> String {
        format_file_size(self.bytes_written)
    }
}

/// Name of the folder an archive is extracted into.
///
/// This is the text of the archive's file name before the first `.`, so
/// `report.v2.zip` extracts into `report`. Returns `None` when that text is
/// empty.
///
/// # Examples
///
/// ```
/// use pdfbundle::ingest::archive_base_name;
///
/// assert_eq!(archive_base_name("scans.zip"), Some("scans"));
/// assert_eq!(archive_base_name("report.v2.zip"), Some("report"));
/// assert_eq!(archive_base_name("uploads/a.zip"), Some("a"));
/// assert_eq!(archive_base_name(".zip"), None);
/// ```
pub fn archive_base_name(archive_name: &str) -> Option<&str> {
    let file_name = archive_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(archive_name);
    let base = file_name.split('.').next().unwrap_or(file_name);
    (!base.is_empty()).then_some(base)
}

/// Decompresses archives into a namespace and enumerates candidates.
pub struct ArchiveIngestor<S> {
    store: Arc<S>,
}

impl<S: BlobStore> ArchiveIngestor<S> {
    /// Create an ingestor writing through `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Extract an archive into `namespace` and return the extraction folder.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The archive name has no usable base name
    /// - The bytes are not a valid ZIP archive, or an entry is corrupt
    /// - The blob store fails to write an entry
    pub async fn extract(
        &self,
        archive_bytes: Vec<u8>,
        archive_name: &str,
        namespace: &BlobKey,
    ) -> Result<BlobKey> {
        let report = self
            .extract_with_report(archive_bytes, archive_name, namespace)
            .await?;
        Ok(report.folder)
    }

    /// Extract an archive and return statistics about the extraction.
    pub async fn extract_with_report(
        &self,
        archive_bytes: Vec<u8>,
        archive_name: &str,
        namespace: &BlobKey,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();

        let base = archive_base_name(archive_name).ok_or_else(|| {
            PdfBundleError::invalid_archive(archive_name, "archive name has no base name")
        })?;
        let folder = namespace.join(base).map_err(|e| {
            PdfBundleError::invalid_archive(archive_name, format!("unusable folder name: {e}"))
        })?;

        let name = archive_name.to_string();
        let (entries, entries_skipped) =
            task::spawn_blocking(move || decompress(&name, archive_bytes))
                .await
                .map_err(|e| PdfBundleError::other(format!("Extraction task failed: {e}")))??;

        let mut bytes_written = 0u64;
        let entries_written = entries.len();
        for (relative, bytes) in entries {
            let key = folder.join_key(&relative);
            bytes_written += bytes.len() as u64;
            debug!(key = %key, size = bytes.len(), "extracted entry");
            self.store.put(&key, bytes).await?;
        }

        let report = ExtractionReport {
            archive: archive_name.to_string(),
            folder,
            entries_written,
            entries_skipped,
            bytes_written,
            extract_time: start.elapsed(),
        };

        info!(
            archive = %report.archive,
            folder = %report.folder,
            entries = report.entries_written,
            skipped = report.entries_skipped,
            size = %report.format_bytes_written(),
            "extracted archive"
        );

        Ok(report)
    }

    /// Every PDF and PNG file below `folder`, at any depth.
    ///
    /// Order follows the store's traversal order, which is not guaranteed to
    /// be stable across platforms. Sort the result if order matters.
    pub async fn list_candidates(&self, folder: &BlobKey) -> Result<Vec<CandidateFile>> {
        let keys = self.store.walk(folder).await?;
        Ok(filter_candidates(keys))
    }
}

/// Read every file entry of a ZIP archive into memory.
///
/// Returns the entries with their archive-relative keys, and the number of
/// entries skipped because their path would escape the extraction folder.
fn decompress(archive_name: &str, archive_bytes: Vec<u8>) -> Result<(Vec<(BlobKey, Vec<u8>)>, usize)> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))
        .map_err(|e| PdfBundleError::invalid_archive(archive_name, e.to_string()))?;

    let mut entries = Vec::with_capacity(archive.len());
    let mut skipped = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| PdfBundleError::invalid_archive(archive_name, e.to_string()))?;

        if entry.is_dir() || entry.name().ends_with('\\') {
            continue;
        }

        // Archives written on Windows may separate folders with `\`.
        let name = entry.name().replace('\\', "/");
        let relative = match BlobKey::from_relative_path(Path::new(&name)) {
            Ok(key) => key,
            Err(_) => {
                warn!(archive = archive_name, entry = entry.name(), "skipping unsafe entry path");
                skipped += 1;
                continue;
            }
        };

        let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
        entry.read_to_end(&mut bytes).map_err(|e| {
            PdfBundleError::invalid_archive(
                archive_name,
                format!("failed to read entry '{}': {e}", relative),
            )
        })?;

        entries.push((relative, bytes));
    }

    Ok((entries, skipped))
}
