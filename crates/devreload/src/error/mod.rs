//! Error handling for the devreload CLI.
//!
//! A small hierarchy built with `thiserror`:
//! - **Top-level errors** (`CliError`) represent broad categories of failures
//! - **Domain-specific errors** (`ConfigError`, `BuildError`) carry detailed context
//! - **Error conversion** is automatic via `#[from]` attributes
//! - **Context helpers** allow attaching additional information to errors
//!
//! Nothing in the reload pipeline itself returns these errors to the host:
//! build failures, watch errors and dropped connections are logged and
//! degraded. `CliError` is for startup, configuration and the one-shot
//! commands.
//!
//! # Example
//!
//! ```rust,no_run
//! use devreload::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_page(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Pages are served from the configured web root")
//! }
//! ```

mod report;

use std::path::PathBuf;
use thiserror::Error;

pub use report::{build_error_to_miette, cli_error_to_miette};

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (file not found, invalid values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bundler invocation errors from the one-shot build command
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file passed with --config doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a devreload.json file or drop the --config flag", .0.display())]
    NotFound(PathBuf),

    /// Config could not be extracted from its sources
    #[error("Invalid configuration: {0}\n\nHint: Check devreload.json syntax and DEVRELOAD_* environment variables")]
    Extract(String),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// A directory the dev host depends on is missing
    #[error("Missing directory for '{field}': {}\n\nHint: {hint}", .path.display())]
    MissingDirectory {
        /// Config field naming the directory
        field: String,
        /// Resolved absolute path
        path: PathBuf,
        /// Helpful hint
        hint: String,
    },
}

/// Bundler invocation errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The bundler process could not be started
    #[error("Failed to launch bundler '{program}': {source}\n\nHint: Check that '{program}' is installed and on PATH")]
    Launch {
        /// Program that was spawned
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The bundler reported an error marker on stderr
    #[error("Bundler reported errors:\n{output}")]
    Reported {
        /// Captured stderr text
        output: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "sse_path".to_string(),
            value: "sse".to_string(),
            hint: "Must start with '/'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'sse_path'"));
        assert!(msg.contains("sse"));
        assert!(msg.contains("Hint: Must start with '/'"));
    }

    #[test]
    fn test_config_error_missing_directory() {
        let err = ConfigError::MissingDirectory {
            field: "web_root".to_string(),
            path: PathBuf::from("/site/wwwroot"),
            hint: "Run from the project root".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("web_root"));
        assert!(msg.contains("/site/wwwroot"));
    }

    #[test]
    fn test_build_error_launch_mentions_program() {
        let err = BuildError::Launch {
            program: "node".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to launch bundler 'node'"));
        assert!(msg.contains("on PATH"));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let config_err = ConfigError::NotFound(PathBuf::from("devreload.json"));
        let cli_err: CliError = config_err.into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/test/index.html").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_with_hint() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::Extract("bad port".to_string()));

        let err = result.with_hint("Use a number").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad port"));
        assert!(msg.contains("Hint: Use a number"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), CliError> = Err(CliError::Server("boom".into()));
        let err = result.context("Failed to start").unwrap_err();
        assert_eq!(err.to_string(), "Failed to start: Server error: boom");
    }
}
