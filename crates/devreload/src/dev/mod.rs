//! Development host.
//!
//! Data flows one way:
//!
//! ```text
//! notify thread ─▶ ChangeTracker ─▶ BuildInvoker ─▶ ReloadBuffers
//!                                                        │
//!               browsers ◀── SSE ◀── ConnectionRegistry ◀── Broadcaster (tick)
//! ```
//!
//! - The watcher filters and debounces file events, then runs the bundler
//!   synchronously and records the outcome.
//! - The broadcaster drains the buffers on a fixed interval and queues
//!   errors or a refresh, plus a heartbeat, on every open connection.
//! - The server streams each connection's queue and serves the web root
//!   with the reload client injected.

pub mod broadcaster;
pub mod buffers;
pub mod config;
pub mod event;
pub mod invoker;
pub mod message;
pub mod middleware;
pub mod server;
pub mod state;
pub mod tracker;
pub mod watcher;

// Re-exports
pub use broadcaster::Broadcaster;
pub use buffers::{ReloadBuffers, TickSignal};
pub use config::DevConfig;
pub use event::{ChangeEvent, ChangeKind};
pub use invoker::{BuildInvoker, BuildReport, Bundler, BundlerOutput, CommandBundler};
pub use message::{EncodedError, ReloadMessage};
pub use server::DevServer;
pub use state::{
    BroadcastReport, BuildStatus, ConnectionGuard, ConnectionId, ConnectionRegistry, DevState,
    SharedState,
};
pub use tracker::{ChangeTracker, DebounceTable, IgnoreReason, TrackOutcome, TrackerPolicy};
pub use watcher::AssetWatcher;
