//! Actor-based cycle driver
//!
//! The monitor runs as an independent async task that owns the
//! [`Reconciler`](crate::reconciler::Reconciler) and communicates via Tokio
//! channels.
//!
//! ## Architecture Overview
//!
//! ```text
//!        main ──spawn──> MonitorActor ──CycleEvent──> broadcast ──> subscribers
//!                           ^
//!                           └── MonitorCommand (CycleNow, UpdateInterval, Shutdown)
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: the actor has an mpsc command channel for control messages
//! 2. **Events**: completed cycles are published to a broadcast channel
//! 3. **Request/Response**: oneshot channels for on-demand cycles

pub mod messages;
pub mod monitor;
