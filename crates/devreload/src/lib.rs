//! devreload - development asset host with live reload.
//!
//! Watches a site's source assets, runs the external bundler when one
//! changes, and pushes the outcome to every connected browser over
//! Server-Sent Events: `refresh` after a good build, the base64-encoded
//! bundler error after a bad one.
//!
//! # Architecture
//!
//! - [`dev`] - Watcher, debouncing tracker, build invoker, buffers,
//!   broadcaster and HTTP server
//! - [`locale`] - `Tmb-Lang` request header resolution
//! - [`config`] - `devreload.json` / environment / CLI layering
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal output
//! - `commands` - `dev`, `build` and `check`
//!
//! # Example
//!
//! ```rust,no_run
//! use devreload::dev::{Broadcaster, DevState};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let state = Arc::new(DevState::new(64));
//! let (_id, _rx) = state.clients.register();
//! state.buffers.record("/site/wwwroot/assets/js/app.js".into(), None);
//!
//! // Queues `refresh` and a heartbeat on the registered connection.
//! Broadcaster::new(Arc::clone(&state), Duration::from_millis(250)).tick();
//! ```

// Public modules
pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod locale;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
