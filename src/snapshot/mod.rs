//! Persisted snapshot document
//!
//! The snapshot is the full state shared with the dashboard and the read
//! API: current tier and latency history per target plus the incident
//! ledger.
//!
//! ## Backends
//!
//! - **File** (default): JSON document replaced through temp file + rename
//! - **In-Memory**: no persistence, for testing
//!
//! ## Usage
//!
//! ```no_run
//! use statuswatch::snapshot::{SnapshotStore, file::FileSnapshotStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = FileSnapshotStore::new("./status.json");
//!     let previous = store.load().await?;
//!     println!("previous snapshot present: {}", previous.is_some());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{SnapshotError, SnapshotResult};
pub use store::SnapshotStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::HealthTier;
use crate::incidents::Incident;

/// Current state of one target as persisted in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub id: String,
    pub name: String,
    pub url: String,
    pub status: HealthTier,
    pub latency_ms: Option<u64>,
    pub checked_at: DateTime<Utc>,
    #[serde(default)]
    pub history_ms: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub updated_at: DateTime<Utc>,

    /// Targets in roster order
    #[serde(default)]
    pub services: Vec<ServiceSnapshot>,

    /// Incident ledger, newest first
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl Snapshot {
    pub fn service(&self, id: &str) -> Option<&ServiceSnapshot> {
        self.services.iter().find(|service| service.id == id)
    }
}
