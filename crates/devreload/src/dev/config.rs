//! Resolved runtime configuration for `devreload dev`.
//!
//! Turns the relative paths of [`DevReloadConfig`] into absolute ones and
//! picks the socket address to bind.

use crate::config::DevReloadConfig;
use crate::dev::tracker::TrackerPolicy;
use crate::error::{ConfigError, Result, ResultExt};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Development host configuration.
#[derive(Debug, Clone)]
pub struct DevConfig {
    /// Loaded configuration
    pub base: DevReloadConfig,

    /// Project root; the bundler runs here
    pub project_root: PathBuf,

    /// Absolute, canonical web root
    pub web_root: PathBuf,

    /// Absolute assets tree being watched
    pub watch_root: PathBuf,

    /// Absolute bundler output tree
    pub output_root: PathBuf,

    /// Server socket address (IP + port)
    pub addr: SocketAddr,
}

impl DevConfig {
    /// Resolve `base` against `project_root`.
    ///
    /// # Errors
    ///
    /// Returns error if validation fails, a required directory is missing,
    /// or no port in the probed range is free
    pub fn resolve(base: DevReloadConfig, project_root: &Path) -> Result<Self> {
        base.validate()?;
        base.validate_layout(project_root)?;

        // Canonical so paths reported by the OS watcher share the prefix.
        let web_root = project_root
            .join(&base.web_root)
            .canonicalize()
            .with_path(project_root.join(&base.web_root))?;
        let watch_root = web_root.join(&base.assets_dir);
        let output_root = web_root.join(&base.output_dir);
        let addr = Self::find_available_port(base.port)?;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            web_root,
            watch_root,
            output_root,
            addr,
            base,
        })
    }

    /// Path filter and debounce window for the change tracker.
    pub fn tracker_policy(&self) -> TrackerPolicy {
        TrackerPolicy::new(
            &self.watch_root,
            &self.output_root,
            &self.base.extensions,
            &self.base.ignore_prefixes,
            &self.base.ignore_suffixes,
            self.base.debounce(),
        )
    }

    /// Find an available port starting from the requested port.
    ///
    /// Tries the requested port first, then the next ten. Port 0 is passed
    /// through for the OS to choose.
    fn find_available_port(requested_port: u16) -> Result<SocketAddr> {
        use std::net::TcpListener;

        let addr = SocketAddr::from(([127, 0, 0, 1], requested_port));
        if requested_port == 0 {
            return Ok(addr);
        }

        if requested_port < 1024 {
            crate::ui::warning(&format!(
                "Port {} is in privileged range, may require root access",
                requested_port
            ));
        }

        if TcpListener::bind(addr).is_ok() {
            return Ok(addr);
        }

        for offset in 1..=10 {
            let port = requested_port.saturating_add(offset);
            let addr = SocketAddr::from(([127, 0, 0, 1], port));
            if TcpListener::bind(addr).is_ok() {
                crate::ui::warning(&format!(
                    "Port {} is busy, using port {} instead",
                    requested_port, port
                ));
                return Ok(addr);
            }
        }

        Err(ConfigError::InvalidValue {
            field: "port".to_string(),
            value: requested_port.to_string(),
            hint: format!(
                "Ports {}-{} are all in use. Try a different port range.",
                requested_port,
                requested_port.saturating_add(10)
            ),
        }
        .into())
    }

    /// Get the server URL as a string.
    pub fn server_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}
