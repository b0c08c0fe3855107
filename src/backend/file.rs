use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::{info, warn};

use crate::codec::Codec;
use crate::document::Document;
use crate::errors::StoreError;

use super::StorageBackend;

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%6f";

/// Backend reading and writing a whole document as a single file on disk,
/// through an injected codec.
///
/// Writes truncate and re-encode the entire file; they are not atomic. The
/// durability net for destructive rewrites is [`FileBackend::backup`], not
/// the write path.
pub struct FileBackend {
    path: PathBuf,
    codec: Codec,
}

impl FileBackend {
    pub fn new<P: Into<PathBuf>>(path: P, codec: Codec) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the current file to a timestamped sibling:
    /// `<stem>.backup.<UTC timestamp><suffix>`.
    ///
    /// Invoked only before a destructive rewrite (legacy upgrade or
    /// migration), never on ordinary writes.
    pub async fn backup(&self) -> Result<PathBuf, StoreError> {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let backup_path = self
            .path
            .with_file_name(format!("{stem}.backup.{timestamp}{suffix}"));
        warn!(
            source = %self.path.display(),
            backup = %backup_path.display(),
            "backing up database file"
        );
        fs::copy(&self.path, &backup_path)
            .await
            .map_err(|e| StoreError::Storage(format!("failed to back up {}: {e}", self.path.display())))?;
        Ok(backup_path)
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn persistent(&self) -> bool {
        true
    }

    async fn read(&self) -> Result<Document, StoreError> {
        info!(path = %self.path.display(), "loading database from file");
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Storage(format!("failed to read {}: {e}", self.path.display())))?;
        self.codec.parse(&raw)
    }

    async fn write(&self, document: &Document) -> Result<(), StoreError> {
        info!(path = %self.path.display(), "saving database to file");
        let raw = self.codec.serialize(document)?;
        fs::write(&self.path, raw)
            .await
            .map_err(|e| StoreError::Storage(format!("failed to write {}: {e}", self.path.display())))?;
        Ok(())
    }
}
