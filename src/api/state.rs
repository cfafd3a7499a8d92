//! API shared state

use std::sync::Arc;

use crate::snapshot::SnapshotStore;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Store the monitor writes its snapshots to
    pub store: Arc<dyn SnapshotStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }
}
