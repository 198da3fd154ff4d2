//! JSON export and the download handoff.

use crate::error::{Result, VaultError};
use crate::models::CredentialStore;
use async_trait::async_trait;
use std::path::PathBuf;

/// File name every export is saved under.
pub const EXPORT_FILENAME: &str = "cattypass-passwords.json";

/// Media type of the export document.
pub const EXPORT_MEDIA_TYPE: &str = "application/json";

/// A generated export ready to be handed to a [`Downloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub media_type: String,
    pub contents: String,
}

/// Serialize the store as 2-space indented JSON with no envelope.
///
/// Fails with [`VaultError::Export`] when there is nothing to export.
pub fn to_json(store: &CredentialStore) -> Result<String> {
    if store.is_empty() {
        return Err(VaultError::Export("No passwords to export.".to_string()));
    }

    serde_json::to_string_pretty(store)
        .map_err(|e| VaultError::Export(format!("failed to serialize passwords: {e}")))
}

/// Build the downloadable export document for `store`.
pub fn export_document(store: &CredentialStore) -> Result<ExportDocument> {
    Ok(ExportDocument {
        filename: EXPORT_FILENAME.to_string(),
        media_type: EXPORT_MEDIA_TYPE.to_string(),
        contents: to_json(store)?,
    })
}

/// Saves a generated document somewhere the user chose.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Save `document` and report where it ended up.
    async fn download(&self, document: &ExportDocument) -> Result<PathBuf>;
}

/// Downloader writing JSON documents into a fixed directory.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    dir: PathBuf,
}

impl FileDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Downloader for FileDownloader {
    async fn download(&self, document: &ExportDocument) -> Result<PathBuf> {
        if document.media_type != EXPORT_MEDIA_TYPE {
            return Err(VaultError::DownloadFailed(format!(
                "unsupported media type: {}",
                document.media_type
            )));
        }

        let target = self.dir.join(&document.filename);

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            VaultError::DownloadFailed(format!("{}: {}", self.dir.display(), e))
        })?;
        tokio::fs::write(&target, document.contents.as_bytes())
            .await
            .map_err(|e| VaultError::DownloadFailed(format!("{}: {}", target.display(), e)))?;

        tracing::info!("Exported passwords to {}", target.display());
        Ok(target)
    }
}
