//! Session identity and per-session state.
//!
//! A session is identified by a [`SessionId`] generated on first use. The id
//! maps deterministically onto a storage namespace, which isolates one
//! session's uploads from every other session's.
//!
//! All mutable per-session state (the id, the extracted candidates and the
//! pending selection) lives in a [`SessionContext`] value that callers thread
//! through every operation. Nothing is kept in globals.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;
use uuid::Uuid;

use crate::config::StorageLayout;
use crate::error::{PdfBundleError, Result};
use crate::ingest::CandidateFile;
use crate::store::BlobKey;

/// Longest accepted session identifier.
const MAX_SESSION_ID_LEN: usize = 64;

/// Opaque, stable identifier of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Parse an identifier.
    ///
    /// Only ASCII alphanumerics and `-` are accepted, so an id can never
    /// address anything outside its own namespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfbundle::session::SessionId;
    ///
    /// assert!(SessionId::parse("3f2c0d9e-8d1b-4b7a-9a53-0a3c5e7f1b22").is_ok());
    /// assert!(SessionId::parse("../other").is_err());
    /// ```
    pub fn parse(id: &str) -> Result<Self> {
        let valid = !id.is_empty()
            && id.len() <= MAX_SESSION_ID_LEN
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(PdfBundleError::InvalidSessionId { id: id.to_string() })
        }
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = PdfBundleError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Per-session state threaded through every interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// Identifier, assigned on first interaction.
    #[serde(default)]
    pub session_id: Option<SessionId>,

    /// Files extracted so far that may be selected.
    #[serde(default)]
    pub candidates: Vec<CandidateFile>,

    /// Pending selection, in output order.
    #[serde(default)]
    pub selection: Vec<CandidateFile>,
}

impl SessionContext {
    /// Create an empty context with no session id yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add candidates, replacing existing entries with the same key.
    ///
    /// Existing entries keep their position; new ones are appended in order.
    pub fn merge_candidates(&mut self, candidates: impl IntoIterator<Item = CandidateFile>) {
        for candidate in candidates {
            match self.candidates.iter_mut().find(|c| c.key == candidate.key) {
                Some(existing) => *existing = candidate,
                None => self.candidates.push(candidate),
            }
        }
    }

    /// Drop every reference to `key` from candidates and selection.
    pub fn forget(&mut self, key: &BlobKey) {
        self.candidates.retain(|c| &c.key != key);
        self.selection.retain(|c| &c.key != key);
    }
}

/// Assigns session identifiers and derives their namespaces.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    layout: StorageLayout,
}

impl SessionRegistry {
    /// Create a registry for the given storage layout.
    pub fn new(layout: StorageLayout) -> Self {
        Self { layout }
    }

    /// Return the context's session id, generating and storing one if absent.
    ///
    /// Repeated calls on the same context return the same id.
    pub fn get_or_create_session_id(&self, ctx: &mut SessionContext) -> SessionId {
        ctx.session_id
            .get_or_insert_with(|| {
                let id = SessionId::generate();
                info!(session = %id, "created session");
                id
            })
            .clone()
    }

    /// Storage namespace of a session. Pure; always below the uploads root.
    pub fn namespace_for(&self, id: &SessionId) -> BlobKey {
        self.layout.session_namespace(id)
    }

    /// The storage layout this registry derives namespaces from.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }
}
