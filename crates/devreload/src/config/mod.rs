//! Configuration for the devreload host with multi-source loading.
//!
//! Merges settings from CLI args, environment variables and `devreload.json`.
//! Priority: CLI > Environment > File > Defaults

mod defaults;
mod loading;
mod tests;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use defaults::*;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "devreload.json";

/// Prefix for environment overrides (`DEVRELOAD_PORT`, `DEVRELOAD_BUNDLER__PROGRAM`).
pub const ENV_PREFIX: &str = "DEVRELOAD_";

/// devreload configuration - loaded from devreload.json, environment and CLI args.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DevReloadConfig {
    /// Static web root served by the dev host, relative to the project root
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,

    /// Watched source tree, relative to the web root
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Bundler output tree, relative to the web root; changes here never trigger a rebuild
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File extensions (without dot) that trigger a rebuild
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File name prefixes marking editor/OS temp files
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,

    /// File name suffixes marking editor/OS temp files
    #[serde(default = "default_ignore_suffixes")]
    pub ignore_suffixes: Vec<String>,

    /// Minimum time between two accepted events for the same path
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Broadcaster poll interval
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Path of the Server-Sent-Events endpoint
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Preferred port; the next ten are probed if it is busy
    #[serde(default = "default_port")]
    pub port: u16,

    /// Open the browser after the server starts
    #[serde(default)]
    pub open: bool,

    /// Run the bundler once before serving
    #[serde(default = "default_build_on_start")]
    pub build_on_start: bool,

    /// Messages queued per connection before a stalled client is dropped
    #[serde(default = "default_client_buffer")]
    pub client_buffer: usize,

    /// External bundler invocation
    #[serde(default)]
    pub bundler: BundlerConfig,
}

/// External bundler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BundlerConfig {
    /// Executable to launch (e.g. "node")
    #[serde(default = "default_bundler_program")]
    pub program: String,

    /// Arguments for watch-triggered builds
    #[serde(default = "default_debug_args")]
    pub debug_args: Vec<String>,

    /// Arguments for `devreload build --release`
    #[serde(default = "default_release_args")]
    pub release_args: Vec<String>,

    /// Substring of stderr that marks a failed build
    #[serde(default = "default_error_marker")]
    pub error_marker: String,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            program: default_bundler_program(),
            debug_args: default_debug_args(),
            release_args: default_release_args(),
            error_marker: default_error_marker(),
        }
    }
}

impl Default for DevReloadConfig {
    fn default() -> Self {
        Self {
            web_root: default_web_root(),
            assets_dir: default_assets_dir(),
            output_dir: default_output_dir(),
            extensions: default_extensions(),
            ignore_prefixes: default_ignore_prefixes(),
            ignore_suffixes: default_ignore_suffixes(),
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            sse_path: default_sse_path(),
            port: default_port(),
            open: false,
            build_on_start: default_build_on_start(),
            client_buffer: default_client_buffer(),
            bundler: BundlerConfig::default(),
        }
    }
}

/// Values supplied on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_on_start: Option<bool>,
}

impl DevReloadConfig {
    /// Generate JSON Schema for devreload.json.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(DevReloadConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }

    /// Debounce window as a duration.
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }

    /// Broadcaster poll interval as a duration.
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }
}
