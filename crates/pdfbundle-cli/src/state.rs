//! Session persistence between invocations.
//!
//! The CLI keeps the [`SessionContext`] in a JSON file so consecutive
//! commands act on the same session.

use std::io;
use std::path::Path;

use pdfbundle::error::{PdfBundleError, Result};
use pdfbundle::session::SessionContext;
use tracing::debug;

/// Load the saved session, or a fresh one if none was saved yet.
pub async fn load(path: &Path) -> Result<SessionContext> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let ctx = serde_json::from_slice(&bytes).map_err(|e| {
                PdfBundleError::invalid_config(format!(
                    "Session state {} is corrupt: {e}",
                    path.display()
                ))
            })?;
            debug!(path = %path.display(), "loaded session state");
            Ok(ctx)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(SessionContext::new()),
        Err(e) => Err(e.into()),
    }
}

/// Save the session, replacing the previous state atomically.
pub async fn save(path: &Path, ctx: &SessionContext) -> Result<()> {
    let json = serde_json::to_vec_pretty(ctx)
        .map_err(|e| PdfBundleError::other(format!("Failed to encode session state: {e}")))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), "saved session state");
    Ok(())
}
