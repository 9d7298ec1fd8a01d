//! Interaction handlers.
//!
//! [`App`] wires the session registry, ingestor, merge engine and catalog
//! over one blob store. Every handler takes the caller's
//! [`SessionContext`], and returns the updated context together with an
//! [`Effect`] describing what happened. The caller decides how to present
//! the effect and where to keep the context.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbundle::app::{App, Effect};
//! use pdfbundle::config::StorageLayout;
//! use pdfbundle::session::SessionContext;
//! use pdfbundle::store::FsBlobStore;
//!
//! # async fn example(zip: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let app = App::new(FsBlobStore::new("storage"), StorageLayout::default());
//!
//! let (ctx, _) = app.upload_archive(&SessionContext::new(), zip, "scans.zip").await?;
//! let keys: Vec<_> = ctx.candidates.iter().map(|c| c.key.clone()).collect();
//! let (ctx, _) = app.select_files(&ctx, &keys)?;
//! let (_, effect) = app.request_merge(&ctx, "combined.pdf").await?;
//! if let Effect::Merged { result } = effect {
//!     println!("{} pages", result.statistics.total_pages);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tracing::info;

use crate::catalog::{Artifact, ArtifactCatalog};
use crate::config::StorageLayout;
use crate::error::{PdfBundleError, Result};
use crate::ingest::{ArchiveIngestor, CandidateFile, ExtractionReport};
use crate::merge::{MergeEngine, MergeResult};
use crate::session::{SessionContext, SessionRegistry};
use crate::store::{BlobKey, BlobStore};
use crate::validation::validate_selection;

/// Observable outcome of a handler.
#[derive(Debug, Clone)]
pub enum Effect {
    /// An archive was extracted.
    Extracted {
        /// Folder the archive was extracted into.
        folder: BlobKey,
        /// Candidates found in that folder.
        candidates: Vec<CandidateFile>,
        /// Extraction statistics.
        report: ExtractionReport,
    },

    /// The pending selection was replaced.
    SelectionUpdated {
        /// The new selection, in output order.
        selection: Vec<CandidateFile>,
    },

    /// A merged PDF was published.
    Merged {
        /// Published artifact and statistics.
        result: MergeResult,
    },

    /// A file was deleted.
    Deleted {
        /// Key of the deleted file.
        key: BlobKey,
    },

    /// Files directly inside the session namespace.
    SessionFiles {
        /// Namespace that was listed.
        namespace: BlobKey,
        /// Keys of the files.
        files: Vec<BlobKey>,
    },

    /// Every published artifact.
    Artifacts {
        /// Artifacts sorted by name.
        artifacts: Vec<Artifact>,
    },

    /// Bytes of an artifact, ready to be handed to the user.
    Download {
        /// Artifact name.
        name: String,
        /// PDF bytes.
        bytes: Vec<u8>,
    },
}

/// Handler result: updated context and effect.
pub type Outcome = Result<(SessionContext, Effect)>;

/// All interaction handlers over a single blob store.
pub struct App<S> {
    registry: SessionRegistry,
    ingestor: ArchiveIngestor<S>,
    engine: MergeEngine<S>,
    catalog: ArtifactCatalog<S>,
}

impl<S: BlobStore> App<S> {
    /// Create the handlers over `store`.
    pub fn new(store: S, layout: StorageLayout) -> Self {
        Self::with_store(Arc::new(store), layout)
    }

    /// Create the handlers over a shared store.
    pub fn with_store(store: Arc<S>, layout: StorageLayout) -> Self {
        Self {
            registry: SessionRegistry::new(layout.clone()),
            ingestor: ArchiveIngestor::new(store.clone()),
            engine: MergeEngine::new(store.clone(), layout.clone()),
            catalog: ArtifactCatalog::new(store, layout),
        }
    }

    /// The session registry used by the handlers.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Extract an uploaded archive into the session namespace.
    ///
    /// A session id is assigned on first use. Candidates found in the
    /// extraction folder are added to the context.
    pub async fn upload_archive(
        &self,
        ctx: &SessionContext,
        archive_bytes: Vec<u8>,
        archive_name: &str,
    ) -> Outcome {
        let mut ctx = ctx.clone();
        let session_id = self.registry.get_or_create_session_id(&mut ctx);
        let namespace = self.registry.namespace_for(&session_id);

        let report = self
            .ingestor
            .extract_with_report(archive_bytes, archive_name, &namespace)
            .await?;
        let candidates = self.ingestor.list_candidates(&report.folder).await?;
        ctx.merge_candidates(candidates.iter().cloned());

        info!(
            session = %session_id,
            archive = archive_name,
            candidates = candidates.len(),
            "upload handled"
        );

        Ok((
            ctx,
            Effect::Extracted {
                folder: report.folder.clone(),
                candidates,
                report,
            },
        ))
    }

    /// Replace the pending selection.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::UnknownSelection`] if a key is not one of the
    /// context's candidates. The context is left unchanged in that case.
    pub fn select_files(&self, ctx: &SessionContext, keys: &[BlobKey]) -> Outcome {
        let selection = validate_selection(&ctx.candidates, keys)?;

        let mut ctx = ctx.clone();
        ctx.selection = selection.clone();

        Ok((ctx, Effect::SelectionUpdated { selection }))
    }

    /// Merge the pending selection into `output_name`.
    pub async fn request_merge(&self, ctx: &SessionContext, output_name: &str) -> Outcome {
        let result = self.engine.merge(&ctx.selection, output_name).await?;
        Ok((ctx.clone(), Effect::Merged { result }))
    }

    /// Delete one file from the session namespace.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::NotFound`] if the context has no session, if
    /// `key` lies outside the session namespace, or if nothing is stored
    /// under it.
    pub async fn request_delete_file(&self, ctx: &SessionContext, key: &BlobKey) -> Outcome {
        let in_session = ctx
            .session_id
            .as_ref()
            .map(|id| key.strip_prefix(&self.registry.namespace_for(id)).is_some())
            .unwrap_or(false);
        if !in_session {
            return Err(PdfBundleError::not_found(key.clone()));
        }

        self.catalog.delete(key).await?;

        let mut ctx = ctx.clone();
        ctx.forget(key);
        Ok((ctx, Effect::Deleted { key: key.clone() }))
    }

    /// List files directly inside the session namespace.
    ///
    /// A session id is assigned if the context has none yet.
    pub async fn list_session_files(&self, ctx: &SessionContext) -> Outcome {
        let mut ctx = ctx.clone();
        let session_id = self.registry.get_or_create_session_id(&mut ctx);
        let namespace = self.registry.namespace_for(&session_id);

        let files = self.catalog.list_session_files(&namespace).await?;
        Ok((ctx, Effect::SessionFiles { namespace, files }))
    }

    /// List every published artifact.
    pub async fn list_artifacts(&self, ctx: &SessionContext) -> Outcome {
        let artifacts = self.catalog.list_artifacts().await?;
        Ok((ctx.clone(), Effect::Artifacts { artifacts }))
    }

    /// Fetch the bytes of a published artifact.
    pub async fn open_artifact(&self, ctx: &SessionContext, name: &str) -> Outcome {
        let bytes = self.catalog.open_artifact(name).await?;
        Ok((
            ctx.clone(),
            Effect::Download {
                name: name.to_string(),
                bytes,
            },
        ))
    }
}
