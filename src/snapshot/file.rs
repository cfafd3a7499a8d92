//! File snapshot store
//!
//! Stores the snapshot as a pretty-printed JSON document. Saves write a
//! hidden temp file next to the target and rename it over the old one, so
//! readers never observe a truncated document and a failed save keeps the
//! previous snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

use super::Snapshot;
use super::error::{SnapshotError, SnapshotResult};
use super::store::SnapshotStore;

#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> SnapshotResult<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| SnapshotError::InvalidLocation(self.path.display().to_string()))?;

        let mut temp_name = std::ffi::OsString::from(".");
        temp_name.push(file_name);
        temp_name.push(".tmp");

        Ok(self.path.with_file_name(temp_name))
    }

    async fn read_bytes(&self) -> SnapshotResult<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_temp(&self, temp_path: &Path, contents: &[u8]) -> SnapshotResult<()> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> SnapshotResult<Option<Snapshot>> {
        let Some(bytes) = self.read_bytes().await? else {
            trace!("no snapshot at {}", self.path.display());
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    async fn load_document(&self) -> SnapshotResult<serde_json::Value> {
        let bytes = self
            .read_bytes()
            .await?
            .ok_or_else(|| SnapshotError::NotFound(self.location()))?;

        serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    async fn save(&self, snapshot: &Snapshot) -> SnapshotResult<()> {
        let contents = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| SnapshotError::SerializationError(e.to_string()))?;
        let temp_path = self.temp_path()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = self.write_temp(&temp_path, &contents).await {
            warn!("failed to write {}: {e}", temp_path.display());
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(
            "wrote snapshot ({} bytes) to {}",
            contents.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
