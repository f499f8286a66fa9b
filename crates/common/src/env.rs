//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Warn when the static client directory is missing and create the parent
/// directory of a file-backed store.
pub async fn ensure_env(static_dir: Option<&str>, store_file: Option<&str>) -> anyhow::Result<()> {
    if let Some(dir) = static_dir {
        if tokio::fs::metadata(dir).await.is_err() {
            warn!(%dir, "static client directory not found; client routes will 404");
        }
    }
    if let Some(parent) = store_file.and_then(|f| Path::new(f).parent()) {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
