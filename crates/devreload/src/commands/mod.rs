//! Command implementations for the devreload CLI.
//!
//! - [`dev`] - Development host with live reload
//! - [`build`] - One-shot bundler run
//! - [`check`] - Configuration validation
//!
//! Each command is implemented in its own module and provides an `execute`
//! function that takes the parsed command arguments and returns a Result.

pub mod build;
pub mod check;
pub mod dev;
pub(crate) mod utils;

// Re-export execute functions for convenience
pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use dev::execute as dev_execute;
