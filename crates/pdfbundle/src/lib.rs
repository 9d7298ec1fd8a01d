//! pdfbundle - Turn uploaded ZIP archives of PDFs and images into one PDF.
//!
//! This library implements a small document workflow over a blob store:
//!
//! - Per-session namespaces for uploads
//! - ZIP extraction that keeps the archive's folder structure
//! - Discovery of PDF and PNG files as merge candidates
//! - Ordered merging of PDFs and images into a shared artifact namespace
//! - Listing, downloading and deleting stored files
//!
//! # Examples
//!
//! ## Full Workflow
//!
//! ```no_run
//! use pdfbundle::app::{App, Effect};
//! use pdfbundle::config::StorageLayout;
//! use pdfbundle::session::SessionContext;
//! use pdfbundle::store::FsBlobStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = App::new(FsBlobStore::new("storage"), StorageLayout::default());
//! let zip = std::fs::read("scans.zip")?;
//!
//! let (ctx, _) = app.upload_archive(&SessionContext::new(), zip, "scans.zip").await?;
//! let keys: Vec<_> = ctx.candidates.iter().map(|c| c.key.clone()).collect();
//! let (ctx, _) = app.select_files(&ctx, &keys)?;
//! let (_, effect) = app.request_merge(&ctx, "combined.pdf").await?;
//!
//! if let Effect::Merged { result } = effect {
//!     println!("Created {} page document", result.statistics.total_pages);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfbundle::config::StorageLayout;
//! use pdfbundle::ingest::ArchiveIngestor;
//! use pdfbundle::merge::MergeEngine;
//! use pdfbundle::store::{BlobKey, FsBlobStore};
//! use std::sync::Arc;
//!
//! # async fn example(zip: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(FsBlobStore::new("storage"));
//! let namespace = BlobKey::new("uploaded_files/manual")?;
//!
//! let ingestor = ArchiveIngestor::new(store.clone());
//! let folder = ingestor.extract(zip, "scans.zip", &namespace).await?;
//! let candidates = ingestor.list_candidates(&folder).await?;
//!
//! let engine = MergeEngine::new(store, StorageLayout::default());
//! engine.merge(&candidates, "scans.pdf").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod io;
pub mod merge;
pub mod output;
pub mod session;
pub mod store;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use app::{App, Effect};
pub use config::{Config, StorageLayout};
pub use error::{PdfBundleError, Result};
pub use session::{SessionContext, SessionId};
pub use store::{BlobKey, BlobStore, FsBlobStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
