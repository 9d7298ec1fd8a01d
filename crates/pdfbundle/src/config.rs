//! Configuration module for pdfbundle.
//!
//! This module holds the validated settings that drive every interaction:
//! - Where the blob store lives on disk
//! - How namespaces are laid out inside the store
//! - Where the session state is persisted between invocations
//! - Output verbosity

use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::error::PdfBundleError;
use crate::session::SessionId;
use crate::store::BlobKey;

/// Namespace holding every session's extracted uploads.
pub const DEFAULT_UPLOADS_NAMESPACE: &str = "uploaded_files";

/// Namespace holding merged PDFs, shared by all sessions.
pub const DEFAULT_COMBINED_NAMESPACE: &str = "combined_pdfs";

/// Default name of a merged PDF when the user does not pick one.
pub const DEFAULT_OUTPUT_NAME: &str = "combined.pdf";

/// File name of the persisted session state, relative to the storage root.
pub const DEFAULT_STATE_FILE: &str = ".pdfbundle-session.json";

/// Names of the namespaces inside the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    /// Root namespace of per-session uploads.
    pub uploads: BlobKey,

    /// Shared namespace of merged artifacts.
    pub combined: BlobKey,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            uploads: BlobKey(DEFAULT_UPLOADS_NAMESPACE.to_string()),
            combined: BlobKey(DEFAULT_COMBINED_NAMESPACE.to_string()),
        }
    }
}

impl StorageLayout {
    /// Create a layout from namespace names.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is not a valid key, or if one
    /// namespace is nested inside the other.
    pub fn new(uploads: &str, combined: &str) -> crate::Result<Self> {
        let uploads = BlobKey::new(uploads)?;
        let combined = BlobKey::new(combined)?;
        if uploads.starts_with(&combined) || combined.starts_with(&uploads) {
            return Err(PdfBundleError::invalid_config(format!(
                "Namespaces must be disjoint: '{uploads}' and '{combined}'"
            )));
        }
        Ok(Self { uploads, combined })
    }

    /// Namespace of a session: `<uploads>/<session-id>`.
    pub fn session_namespace(&self, id: &SessionId) -> BlobKey {
        BlobKey(format!("{}/{}", self.uploads.as_str(), id.as_str()))
    }

    /// Key of a merged artifact: `<combined>/<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::InvalidOutputName`] unless `name` is a
    /// single plain path segment.
    pub fn artifact_key(&self, name: &str) -> crate::Result<BlobKey> {
        crate::validation::validate_output_name(name)?;
        self.combined
            .join(name)
            .map_err(|_| PdfBundleError::InvalidOutputName {
                name: name.to_string(),
            })
    }
}

/// Complete configuration for a pdfbundle invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the blob store.
    pub root: PathBuf,

    /// Namespace names inside the store.
    pub layout: StorageLayout,

    /// File holding the persisted session context.
    pub state_file: PathBuf,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Emit listings as JSON.
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        let root = PathBuf::from(".");
        Self {
            state_file: root.join(DEFAULT_STATE_FILE),
            root,
            layout: StorageLayout::default(),
            verbose: false,
            quiet: false,
            json: false,
        }
    }
}

impl Config {
    /// Create a configuration rooted at `root` with default layout and state file.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            state_file: root.join(DEFAULT_STATE_FILE),
            root,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The storage root is empty
    /// - Verbose and quiet modes are both enabled
    /// - The state file is placed inside a store namespace
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            bail!("Storage root must not be empty");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        for namespace in [&self.layout.uploads, &self.layout.combined] {
            let dir = namespace.to_path(&self.root);
            if self.state_file.starts_with(&dir) {
                bail!(
                    "State file {} must not live inside the '{}' namespace",
                    self.state_file.display(),
                    namespace
                );
            }
        }

        Ok(())
    }

    /// Check if output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}
