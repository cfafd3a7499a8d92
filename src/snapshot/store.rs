//! Snapshot store trait definition

use async_trait::async_trait;

use super::Snapshot;
use super::error::SnapshotResult;

/// Durable home of the snapshot document
///
/// The monitor is the only writer: it loads the previous snapshot once at
/// the start of a cycle and replaces it wholesale at the end. Readers (the
/// API) only ever see complete documents.
///
/// Implementations must be `Send + Sync` as they are shared between the
/// monitor task and API handlers.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the typed snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been written yet, and
    /// `SnapshotError::Malformed` when the stored document cannot be parsed.
    async fn load(&self) -> SnapshotResult<Option<Snapshot>>;

    /// Load the stored document as-is, for serving it verbatim.
    ///
    /// A missing document is an error here (`SnapshotError::NotFound`).
    async fn load_document(&self) -> SnapshotResult<serde_json::Value>;

    /// Replace the stored snapshot atomically.
    ///
    /// A failed save must leave the previous snapshot readable.
    async fn save(&self, snapshot: &Snapshot) -> SnapshotResult<()>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}
