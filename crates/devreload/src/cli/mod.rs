//! Command-line interface definition for devreload.
//!
//! # Command Structure
//!
//! - `devreload dev` - Serve the web root, watch assets and push reloads
//! - `devreload build` - Run the bundler once
//! - `devreload check` - Validate configuration and site layout

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, DevArgs, ProjectArgs};

/// devreload - development asset host with live reload
#[derive(Parser, Debug)]
#[command(
    name = "devreload",
    version,
    about = "Watch site assets, rebuild with your bundler and reload the browser",
    long_about = "devreload watches wwwroot/assets, runs the external bundler when a\n\
                  source file changes, and tells every open browser tab to reload (or\n\
                  shows the bundler's error in the console) over Server-Sent Events."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows every accepted change, bundler invocation and connection event.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Outputs plain text without ANSI color codes. Useful for logging to
    /// files or systems that don't support colored terminal output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
