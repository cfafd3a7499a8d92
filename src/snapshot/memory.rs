//! In-memory snapshot store (no persistence)
//!
//! Useful for testing the monitor and the API without touching the file
//! system. Writes can be made to fail on demand.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::Snapshot;
use super::error::{SnapshotError, SnapshotResult};
use super::store::SnapshotStore;

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: RwLock<Option<Snapshot>>,
    fail_writes: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent saves fail with an I/O error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> SnapshotResult<Option<Snapshot>> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn load_document(&self) -> SnapshotResult<serde_json::Value> {
        let snapshot = self.snapshot.read().await;
        let snapshot = snapshot
            .as_ref()
            .ok_or_else(|| SnapshotError::NotFound(self.location()))?;

        serde_json::to_value(snapshot).map_err(|e| SnapshotError::SerializationError(e.to_string()))
    }

    async fn save(&self, snapshot: &Snapshot) -> SnapshotResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SnapshotError::IoError(std::io::Error::other(
                "writes disabled",
            )));
        }

        debug!("in-memory store: replacing snapshot");
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
