//! Candidate files and kind inference.

use serde::{Deserialize, Serialize};

use crate::store::BlobKey;

/// Kind of an extracted file, inferred from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A PDF document (`.pdf`).
    Pdf,
    /// A raster image (`.png`).
    Image,
    /// Anything else. Never offered for selection.
    Other,
}

impl FileKind {
    /// Infer the kind from a file name, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfbundle::ingest::FileKind;
    ///
    /// assert_eq!(FileKind::from_name("Report.PDF"), FileKind::Pdf);
    /// assert_eq!(FileKind::from_name("scan.Png"), FileKind::Image);
    /// assert_eq!(FileKind::from_name("notes.txt"), FileKind::Other);
    /// ```
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Self::Pdf
        } else if lower.ends_with(".png") {
            Self::Image
        } else {
            Self::Other
        }
    }

    /// Whether files of this kind are offered for selection.
    pub fn is_candidate(&self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Other => "other",
        }
    }
}

/// An extracted file that can be selected for merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    /// Storage key of the file.
    pub key: BlobKey,

    /// File name (last key segment).
    pub name: String,

    /// Inferred kind.
    pub kind: FileKind,
}

impl CandidateFile {
    /// Describe the file stored under `key`.
    pub fn from_key(key: BlobKey) -> Self {
        let name = key.file_name().to_string();
        let kind = FileKind::from_name(&name);
        Self { key, name, kind }
    }
}

/// Keep only PDF and PNG files, preserving order.
pub fn filter_candidates(keys: impl IntoIterator<Item = BlobKey>) -> Vec<CandidateFile> {
    keys.into_iter()
        .map(CandidateFile::from_key)
        .filter(|c| c.kind.is_candidate())
        .collect()
}
