//! Core merge implementation.
//!
//! This module implements the merge algorithm that turns an ordered
//! selection of PDFs and images into one published document.

use lopdf::Document;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::catalog::Artifact;
use crate::config::StorageLayout;
use crate::error::{PdfBundleError, Result};
use crate::ingest::{CandidateFile, FileKind};
use crate::io::{PdfReader, PdfWriter};
use crate::merge::image::load_image_document;
use crate::merge::pages::PageAssembler;
use crate::store::{BlobKey, BlobStore};
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStatistics {
    /// Number of inputs that contributed pages.
    pub files_merged: usize,

    /// Number of inputs skipped because they are neither PDF nor image.
    pub files_skipped: usize,

    /// Number of PDF inputs.
    pub pdf_inputs: usize,

    /// Number of image inputs.
    pub image_inputs: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the inputs.
    pub input_size: u64,

    /// Size of the published document.
    pub output_size: u64,

    /// Total time taken for the merge.
    #[serde(skip)]
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Result of a merge operation.
#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    /// The published document.
    pub artifact: Artifact,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// One async lock per artifact key, held only while a merge publishes.
#[derive(Default)]
struct ArtifactLocks {
    locks: Mutex<HashMap<BlobKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl ArtifactLocks {
    fn lock_for(&self, key: &BlobKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.clone()).or_default().clone()
    }

    /// Give back a lock taken with [`lock_for`](Self::lock_for).
    ///
    /// The entry is dropped once no other merge holds or waits on it.
    fn release(&self, key: &BlobKey, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks.get(key).is_some_and(|entry| Arc::strong_count(entry) == 1) {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Merges selected files into artifacts in the combined namespace.
pub struct MergeEngine<S> {
    /// Store holding inputs and artifacts.
    store: Arc<S>,

    /// Where artifacts are published.
    layout: StorageLayout,

    /// Reader for stored PDFs.
    reader: PdfReader,

    /// Writer for the merged document.
    writer: PdfWriter,

    locks: ArtifactLocks,
}

impl<S: BlobStore> MergeEngine<S> {
    /// Create an engine publishing into `layout`'s combined namespace.
    pub fn new(store: Arc<S>, layout: StorageLayout) -> Self {
        Self {
            store,
            layout,
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
            locks: ArtifactLocks::default(),
        }
    }

    /// Merge `files`, in order, into the artifact called `output_name`.
    ///
    /// PDF inputs contribute all their pages in their original order; image
    /// inputs contribute one page each. Any existing artifact with the same
    /// name is replaced.
    ///
    /// # Arguments
    ///
    /// * `files` - Inputs in output order; duplicates are merged twice
    /// * `output_name` - Plain file name of the artifact
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `output_name` is not a plain file name
    /// - `files` is empty or contains no PDF or image
    /// - An input is missing, or cannot be decoded
    /// - The store fails to publish the result
    ///
    /// Nothing is published when an error is returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfbundle::merge::MergeEngine;
    /// # use pdfbundle::ingest::CandidateFile;
    /// # use pdfbundle::store::MemoryBlobStore;
    /// # async fn example(engine: MergeEngine<MemoryBlobStore>, files: Vec<CandidateFile>) -> Result<(), Box<dyn std::error::Error>> {
    /// let result = engine.merge(&files, "combined.pdf").await?;
    /// println!("Merged {} files into {} pages",
    ///          result.statistics.files_merged,
    ///          result.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, files: &[CandidateFile], output_name: &str) -> Result<MergeResult> {
        let merge_start = Instant::now();

        let key = self.layout.artifact_key(output_name)?;
        if files.is_empty() {
            return Err(PdfBundleError::NoFilesToMerge);
        }

        let mut assembler = PageAssembler::new();
        let mut pdf_inputs = 0;
        let mut image_inputs = 0;
        let mut files_skipped = 0;
        let mut input_size = 0;

        for file in files {
            let (document, size) = match file.kind {
                FileKind::Pdf => {
                    let loaded = self.reader.load(self.store.as_ref(), &file.key).await?;
                    pdf_inputs += 1;
                    (loaded.document, loaded.file_size)
                }
                FileKind::Image => {
                    let bytes = self.store.get(&file.key).await?;
                    let size = bytes.len() as u64;
                    let document = load_image_document(&file.key, bytes).await?;
                    image_inputs += 1;
                    (document, size)
                }
                FileKind::Other => {
                    debug!(key = %file.key, "skipping file that is neither pdf nor image");
                    files_skipped += 1;
                    continue;
                }
            };

            input_size += size;
            let pages = assembler.append(document)?;
            debug!(key = %file.key, pages, "appended input");
        }

        let total_pages = assembler.page_count();
        if total_pages == 0 {
            return Err(PdfBundleError::NoFilesToMerge);
        }

        let document: Document = assembler.finish();

        let lock = self.locks.lock_for(&key);
        let write = {
            let _guard = lock.lock().await;
            self.writer.save(self.store.as_ref(), &key, document).await
        };
        self.locks.release(&key, lock);
        let write = write?;

        let statistics = MergeStatistics {
            files_merged: pdf_inputs + image_inputs,
            files_skipped,
            pdf_inputs,
            image_inputs,
            total_pages,
            input_size,
            output_size: write.file_size,
            merge_time: merge_start.elapsed(),
        };

        info!(
            artifact = %key,
            files = statistics.files_merged,
            pages = statistics.total_pages,
            size = %statistics.format_output_size(),
            "published merged pdf"
        );

        Ok(MergeResult {
            artifact: Artifact {
                name: output_name.to_string(),
                key,
                size: write.file_size,
            },
            statistics,
        })
    }
}
