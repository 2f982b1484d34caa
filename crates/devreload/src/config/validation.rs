use crate::config::DevReloadConfig;
use crate::error::ConfigError;
use std::path::Path;

fn invalid(field: &str, value: impl ToString, hint: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
}

impl DevReloadConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(invalid(
                "poll_interval_ms",
                0,
                "Poll interval must be at least 1ms",
            ));
        }

        if !self.sse_path.starts_with('/') || self.sse_path.len() < 2 {
            return Err(invalid(
                "sse_path",
                &self.sse_path,
                "Endpoint path must start with '/' and name a route, e.g. \"/sse\"",
            ));
        }

        if self.sse_path.starts_with("/__devreload__") {
            return Err(invalid(
                "sse_path",
                &self.sse_path,
                "The /__devreload__ prefix is reserved for the reload client and status routes",
            ));
        }

        if self.extensions.is_empty() {
            return Err(invalid(
                "extensions",
                "[]",
                "List at least one extension to watch, e.g. [\"js\", \"css\"]",
            ));
        }

        if let Some(ext) = self
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.'))
        {
            return Err(invalid(
                "extensions",
                ext,
                "Write extensions without a leading dot, e.g. \"scss\"",
            ));
        }

        if self.client_buffer == 0 {
            return Err(invalid(
                "client_buffer",
                0,
                "Each connection needs room for at least one message",
            ));
        }

        if self.bundler.program.trim().is_empty() {
            return Err(invalid(
                "bundler.program",
                "",
                "Name the bundler executable, e.g. \"node\"",
            ));
        }

        if self.bundler.error_marker.is_empty() {
            return Err(invalid(
                "bundler.error_marker",
                "",
                "An empty marker would flag every build as failed",
            ));
        }

        Ok(())
    }

    /// Check that the web root and the watched assets tree exist under `project_root`.
    pub fn validate_layout(&self, project_root: &Path) -> Result<(), ConfigError> {
        let web_root = project_root.join(&self.web_root);
        if !web_root.is_dir() {
            return Err(ConfigError::MissingDirectory {
                field: "web_root".to_string(),
                path: web_root,
                hint: "Run devreload from the project root or set web_root".to_string(),
            });
        }

        let assets = web_root.join(&self.assets_dir);
        if !assets.is_dir() {
            return Err(ConfigError::MissingDirectory {
                field: "assets_dir".to_string(),
                path: assets,
                hint: "The watched source tree must exist before watching starts".to_string(),
            });
        }

        Ok(())
    }
}
