use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Available devreload subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development host
    ///
    /// Serves the web root, watches the assets tree, rebuilds on change and
    /// pushes reload or error messages to connected browsers.
    Dev(DevArgs),

    /// Run the bundler once
    ///
    /// Exits non-zero and prints the bundler output when it reports errors.
    Build(BuildArgs),

    /// Validate configuration
    ///
    /// Checks devreload.json, environment overrides and the web root layout.
    Check(CheckArgs),
}

/// Options shared by every command for locating the project.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to devreload.json
    ///
    /// If not provided, devreload.json in the project root is used when present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the dev command
#[derive(Args, Debug)]
pub struct DevArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Port to listen on; the next ten are tried if it is busy
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Web root to serve and watch, relative to the project root
    #[arg(long, value_name = "DIR")]
    pub web_root: Option<PathBuf>,

    /// Debounce window for repeated changes to one file
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,

    /// Skip the bundler run before serving
    #[arg(long)]
    pub no_initial_build: bool,
}

impl DevArgs {
    /// Flags that override file and environment configuration.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            web_root: self.web_root.clone(),
            port: self.port,
            open: self.open.then_some(true),
            debounce_ms: self.debounce,
            build_on_start: self.no_initial_build.then_some(false),
        }
    }
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Use the production build script instead of the debug one
    #[arg(long)]
    pub release: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print the JSON schema of devreload.json and exit
    #[arg(long)]
    pub schema: bool,
}
