//! Shared state for the development host.
//!
//! Holds the reload buffers, the registry of open event-stream connections
//! and the status of the most recent build. Locks are parking_lot; none is
//! held across an await point.

use crate::dev::buffers::ReloadBuffers;
use crate::dev::message::ReloadMessage;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Build status tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// No build has been performed yet
    NotStarted,
    /// Build is currently in progress
    InProgress { started_at: Instant },
    /// Build completed successfully
    Success { duration_ms: u64 },
    /// Build failed with error
    Failed { error: String },
}

impl BuildStatus {
    /// Check if build is currently running.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::InProgress { .. })
    }

    /// Check if last build succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success { .. })
    }

    /// Check if build has not started yet.
    pub fn is_not_started(&self) -> bool {
        matches!(self, BuildStatus::NotStarted)
    }

    /// Get error message if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            BuildStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Short name used by the status endpoint.
    pub fn label(&self) -> &'static str {
        match self {
            BuildStatus::NotStarted => "not_started",
            BuildStatus::InProgress { .. } => "in_progress",
            BuildStatus::Success { .. } => "success",
            BuildStatus::Failed { .. } => "failed",
        }
    }
}

/// Identity of one open event-stream connection.
pub type ConnectionId = u64;

/// Result of pushing one tick's messages to every connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections that accepted every message
    pub delivered: usize,
    /// Connections removed because they were closed or stalled
    pub dropped: Vec<ConnectionId>,
}

/// Open event-stream connections.
///
/// Each connection owns a bounded queue; the registry keeps the sending
/// half. Removing the entry drops the sender, which ends that response
/// stream.
#[derive(Debug)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    capacity: usize,
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<ReloadMessage>>>,
}

impl ConnectionRegistry {
    /// Create a registry whose per-connection queues hold `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            capacity: capacity.max(1),
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// # Returns
    ///
    /// Connection ID and receiver for its messages
    pub fn register(&self) -> (ConnectionId, mpsc::Receiver<ReloadMessage>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.capacity);
        self.connections.write().insert(id, tx);
        (id, rx)
    }

    /// Remove a connection. Returns whether it was still registered.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.connections.write().remove(&id).is_some()
    }

    /// Remove every connection, ending all open streams.
    pub fn close_all(&self) -> usize {
        let mut connections = self.connections.write();
        let count = connections.len();
        connections.clear();
        count
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().contains_key(&id)
    }

    /// Get number of open connections.
    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }

    /// Queue `messages`, in order, on every open connection.
    ///
    /// Works on a snapshot so connections may come and go meanwhile. Never
    /// waits: a connection whose queue is closed or full is removed, which
    /// leaves the others untouched.
    pub fn broadcast(&self, messages: &[ReloadMessage]) -> BroadcastReport {
        let snapshot: Vec<(ConnectionId, mpsc::Sender<ReloadMessage>)> = self
            .connections
            .read()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut report = BroadcastReport::default();

        for (id, tx) in snapshot {
            let outcome = messages
                .iter()
                .try_for_each(|message| tx.try_send(message.clone()));

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Connection {} closed, removing", id);
                    report.dropped.push(id);
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Connection {} is not reading its stream, dropping it", id);
                    report.dropped.push(id);
                }
            }
        }

        for id in &report.dropped {
            self.unregister(*id);
        }

        report
    }
}

/// Removes its connection from the registry when dropped.
///
/// Lives inside the response stream, so a client disconnect (which drops
/// the stream) unregisters the connection immediately.
#[derive(Debug)]
pub struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn new(registry: Arc<ConnectionRegistry>, id: ConnectionId) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.registry.unregister(self.id) {
            tracing::info!(
                "Client {} disconnected ({} open)",
                self.id,
                self.registry.len()
            );
        }
    }
}

/// Shared development host state.
pub struct DevState {
    /// Error and change queues
    pub buffers: ReloadBuffers,

    /// Open event-stream connections
    pub clients: Arc<ConnectionRegistry>,

    /// Most recent build status
    status: RwLock<BuildStatus>,
}

impl DevState {
    /// Create state whose connections queue up to `client_buffer` messages.
    pub fn new(client_buffer: usize) -> Self {
        Self {
            buffers: ReloadBuffers::new(),
            clients: Arc::new(ConnectionRegistry::new(client_buffer)),
            status: RwLock::new(BuildStatus::NotStarted),
        }
    }

    /// Update build status to in-progress.
    pub fn start_build(&self) {
        *self.status.write() = BuildStatus::InProgress {
            started_at: Instant::now(),
        };
    }

    /// Update build status to success.
    pub fn complete_build(&self, duration_ms: u64) {
        *self.status.write() = BuildStatus::Success { duration_ms };
    }

    /// Update build status to failed.
    pub fn fail_build(&self, error: String) {
        *self.status.write() = BuildStatus::Failed { error };
    }

    /// Get current build status.
    pub fn get_status(&self) -> BuildStatus {
        self.status.read().clone()
    }

    /// Get number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

impl Default for DevState {
    fn default() -> Self {
        Self::new(crate::config::default_client_buffer())
    }
}

/// Shared state handle for passing around the application.
pub type SharedState = Arc<DevState>;
