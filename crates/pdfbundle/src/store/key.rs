//! Validated blob keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{PdfBundleError, Result};

/// Relative, `/`-separated address of a blob or namespace.
///
/// A key never contains empty segments, `.` or `..`, backslashes or NUL
/// bytes, and never starts with `/`. Joining a key onto a store root
/// therefore always stays inside that root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobKey(pub(crate) String);

impl BlobKey {
    /// Parse and validate a key.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::InvalidKey`] if any segment is empty, `.`,
    /// `..`, or contains a backslash or NUL byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfbundle::store::BlobKey;
    ///
    /// let key = BlobKey::new("uploaded_files/abc/report/doc.pdf").unwrap();
    /// assert_eq!(key.file_name(), "doc.pdf");
    /// assert!(BlobKey::new("../etc/passwd").is_err());
    /// ```
    pub fn new(key: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(PdfBundleError::invalid_key(key, "key is empty"));
        }
        for segment in key.split('/') {
            validate_segment(key, segment)?;
        }
        Ok(Self(key.to_string()))
    }

    /// Build a key from a relative filesystem path.
    ///
    /// `.` components are dropped; anything that is not a plain UTF-8
    /// component is rejected.
    pub fn from_relative_path(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| {
                        PdfBundleError::invalid_key(&display, "path is not valid UTF-8")
                    })?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                _ => {
                    return Err(PdfBundleError::invalid_key(
                        &display,
                        "path must be relative and must not contain '..'",
                    ));
                }
            }
        }
        Self::new(segments.join("/"))
    }

    /// Append a single segment.
    pub fn join(&self, segment: &str) -> Result<Self> {
        validate_segment(segment, segment)?;
        Ok(Self(format!("{}/{}", self.0, segment)))
    }

    /// Append another key below this one.
    pub fn join_key(&self, other: &BlobKey) -> Self {
        Self(format!("{}/{}", self.0, other.0))
    }

    /// Last segment of the key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Key of the enclosing namespace, if any.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Whether this key equals `namespace` or lies below it.
    ///
    /// Comparison is segment-wise: `a/bc` does not start with `a/b`.
    pub fn starts_with(&self, namespace: &BlobKey) -> bool {
        self.0 == namespace.0
            || (self.0.starts_with(&namespace.0)
                && self.0.as_bytes().get(namespace.0.len()) == Some(&b'/'))
    }

    /// Key relative to `namespace`, if it lies strictly below it.
    pub fn strip_prefix(&self, namespace: &BlobKey) -> Option<&str> {
        self.0
            .strip_prefix(&namespace.0)
            .and_then(|rest| rest.strip_prefix('/'))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the key against a filesystem root.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

fn validate_segment(key: &str, segment: &str) -> Result<()> {
    let reason = if segment.is_empty() {
        "key contains an empty segment"
    } else if segment == "." || segment == ".." {
        "key must not contain '.' or '..' segments"
    } else if segment.contains('\\') || segment.contains('/') {
        "segment must not contain path separators"
    } else if segment.contains('\0') {
        "key must not contain NUL bytes"
    } else {
        return Ok(());
    };
    Err(PdfBundleError::invalid_key(key, reason))
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BlobKey {
    type Error = PdfBundleError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BlobKey> for String {
    fn from(key: BlobKey) -> Self {
        key.0
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
