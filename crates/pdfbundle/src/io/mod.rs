//! PDF encoding and decoding.
//!
//! This module sits between the blob store and the merge engine:
//! - [`PdfReader`] decodes stored bytes into a [`lopdf::Document`]
//! - [`PdfWriter`] serializes a finished document and publishes it
//!
//! CPU-heavy parsing and serialization run on the blocking thread pool so
//! the async runtime stays responsive.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbundle::io::{PdfReader, PdfWriter};
//! use pdfbundle::store::{BlobKey, FsBlobStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FsBlobStore::new("storage");
//! let key = BlobKey::new("uploaded_files/session/scans/doc.pdf")?;
//!
//! let loaded = PdfReader::new().load(&store, &key).await?;
//! let out = BlobKey::new("combined_pdfs/copy.pdf")?;
//! PdfWriter::new().save(&store, &out, loaded.document).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteStatistics};
