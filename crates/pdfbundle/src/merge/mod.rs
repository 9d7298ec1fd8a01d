//! Merging selected files into a single PDF.
//!
//! This module contains the merge pipeline:
//! - [`MergeEngine`] drives a merge and publishes the result
//! - [`pages::PageAssembler`] grafts pages onto one page tree
//! - [`image`] turns raster images into single-page documents
//!
//! # Examples
//!
//! ```no_run
//! use pdfbundle::config::StorageLayout;
//! use pdfbundle::ingest::CandidateFile;
//! use pdfbundle::merge::MergeEngine;
//! use pdfbundle::store::{BlobKey, FsBlobStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = MergeEngine::new(Arc::new(FsBlobStore::new("storage")), StorageLayout::default());
//! let files = vec![
//!     CandidateFile::from_key(BlobKey::new("uploaded_files/s/scans/cover.png")?),
//!     CandidateFile::from_key(BlobKey::new("uploaded_files/s/scans/report.pdf")?),
//! ];
//! let result = engine.merge(&files, "combined.pdf").await?;
//! println!("Created {} page document", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod image;
pub mod merger;
pub mod pages;

pub use merger::{MergeEngine, MergeResult, MergeStatistics};
pub use pages::PageAssembler;
