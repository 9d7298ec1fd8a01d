//! Request validation for pdfbundle.
//!
//! This module checks user-supplied values before any storage access:
//! - Output names must be a single plain path segment
//! - Selections may only reference extracted candidate files
//!
//! # Examples
//!
//! ```
//! use pdfbundle::validation::validate_output_name;
//!
//! assert!(validate_output_name("combined.pdf").is_ok());
//! assert!(validate_output_name("../escape.pdf").is_err());
//! ```

use crate::error::{PdfBundleError, Result};
use crate::ingest::CandidateFile;
use crate::store::BlobKey;

/// Check that `name` can be used as a merged artifact name.
///
/// # Errors
///
/// Returns [`PdfBundleError::InvalidOutputName`] if the name:
/// - Is empty
/// - Is `.` or `..`
/// - Contains `/`, `\` or a NUL byte
pub fn validate_output_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);

    if valid {
        Ok(())
    } else {
        Err(PdfBundleError::InvalidOutputName {
            name: name.to_string(),
        })
    }
}

/// Resolve selected keys against the known candidates.
///
/// The result preserves the order of `keys`, duplicates included, so the
/// caller fully controls the page order of the merged document.
///
/// # Errors
///
/// Returns [`PdfBundleError::UnknownSelection`] for the first key that is not
/// one of `candidates`.
pub fn validate_selection(candidates: &[CandidateFile], keys: &[BlobKey]) -> Result<Vec<CandidateFile>> {
    keys.iter()
        .map(|key| {
            candidates
                .iter()
                .find(|c| &c.key == key)
                .cloned()
                .ok_or_else(|| PdfBundleError::UnknownSelection {
                    key: key.to_string(),
                })
        })
        .collect()
}
