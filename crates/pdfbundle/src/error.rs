//! Error types for pdfbundle.
//!
//! Every failure an interaction can produce is a [`PdfBundleError`]. Errors
//! carry enough context to be shown to the user as-is: the archive, blob key
//! or artifact name involved and the underlying reason.
//!
//! # Error Categories
//!
//! - **Archive Errors**: The uploaded bytes are not a readable ZIP archive
//! - **Input Errors**: A selected PDF or image cannot be decoded
//! - **Storage Errors**: The blob store failed to read or write
//! - **Lookup Errors**: A file or artifact does not exist
//! - **Request Errors**: Invalid names, keys, selections or configuration

use std::io;

use crate::store::BlobKey;

/// Result type alias for pdfbundle operations.
pub type Result<T> = std::result::Result<T, PdfBundleError>;

/// Main error type for pdfbundle operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfBundleError {
    /// Uploaded bytes are not a valid archive.
    #[error("Invalid archive: {name}\n  Reason: {reason}")]
    InvalidArchive {
        /// Name the archive was uploaded under.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A selected PDF is corrupt or not a PDF at all.
    #[error("Unreadable PDF: {key}\n  Reason: {reason}")]
    UnreadablePdf {
        /// Key of the offending file.
        key: BlobKey,
        /// Reason for the failure.
        reason: String,
    },

    /// A selected image cannot be decoded.
    #[error("Unreadable image: {key}\n  Reason: {reason}")]
    UnreadableImage {
        /// Key of the offending file.
        key: BlobKey,
        /// Reason for the failure.
        reason: String,
    },

    /// The blob store failed while accessing a key.
    #[error("Storage failure at: {key}\n  Reason: {source}")]
    Storage {
        /// Key being accessed.
        key: BlobKey,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A file or artifact does not exist.
    #[error("Not found: {key}")]
    NotFound {
        /// Key that was looked up.
        key: BlobKey,
    },

    /// Merge requested with nothing to merge.
    #[error("No files selected for merging")]
    NoFilesToMerge,

    /// Output name is not a plain file name.
    #[error(
        "Invalid output name: '{name}'\n  Hint: use a plain file name such as 'combined.pdf'"
    )]
    InvalidOutputName {
        /// Rejected name.
        name: String,
    },

    /// A blob key failed validation.
    #[error("Invalid storage key: '{key}'\n  Reason: {reason}")]
    InvalidKey {
        /// Rejected key.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A session identifier failed validation.
    #[error("Invalid session id: '{id}'")]
    InvalidSessionId {
        /// Rejected identifier.
        id: String,
    },

    /// A selection referenced a file that is not an extracted candidate.
    #[error(
        "Not a candidate file: {key}\n  Hint: upload an archive containing it or pick from the candidate list"
    )]
    UnknownSelection {
        /// Key that is not a candidate.
        key: String,
    },

    /// Assembling the merged document failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for PdfBundleError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfBundleError {
    /// Create an InvalidArchive error.
    pub fn invalid_archive(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArchive {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnreadablePdf error.
    pub fn unreadable_pdf(key: BlobKey, reason: impl Into<String>) -> Self {
        Self::UnreadablePdf {
            key,
            reason: reason.into(),
        }
    }

    /// Create an UnreadableImage error.
    pub fn unreadable_image(key: BlobKey, reason: impl Into<String>) -> Self {
        Self::UnreadableImage {
            key,
            reason: reason.into(),
        }
    }

    /// Create a Storage error.
    pub fn storage(key: BlobKey, source: io::Error) -> Self {
        Self::Storage { key, source }
    }

    /// Create a NotFound error.
    pub fn not_found(key: BlobKey) -> Self {
        Self::NotFound { key }
    }

    /// Create an InvalidKey error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the request rather than the environment.
    ///
    /// User errors are fixed by changing the input (another archive, another
    /// selection, another name); everything else points at storage or a bug.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArchive { .. }
                | Self::UnreadablePdf { .. }
                | Self::UnreadableImage { .. }
                | Self::NotFound { .. }
                | Self::NoFilesToMerge
                | Self::InvalidOutputName { .. }
                | Self::InvalidKey { .. }
                | Self::InvalidSessionId { .. }
                | Self::UnknownSelection { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 2,
            Self::InvalidArchive { .. } => 3,
            Self::UnreadablePdf { .. } => 3,
            Self::UnreadableImage { .. } => 3,
            Self::NoFilesToMerge => 1,
            Self::InvalidOutputName { .. } => 1,
            Self::InvalidKey { .. } => 1,
            Self::InvalidSessionId { .. } => 1,
            Self::UnknownSelection { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Storage { .. } => 5,
            Self::Io { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::Other { .. } => 1,
        }
    }
}
