use crate::config::{CONFIG_FILE_NAME, ConfigOverrides, DevReloadConfig, ENV_PREFIX};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::{Path, PathBuf};

impl DevReloadConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// Without an explicit `config_path`, `devreload.json` in `project_root`
    /// is used when present.
    pub fn load(
        project_root: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = Self::locate_file(project_root, config_path)? {
            tracing::debug!("Loading config file {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        // DEVRELOAD_PORT=5050, DEVRELOAD_BUNDLER__PROGRAM=npx
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment = figment.merge(Serialized::defaults(overrides));

        figment
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()).into())
    }

    fn locate_file(project_root: &Path, config_path: Option<&Path>) -> Result<Option<PathBuf>> {
        match config_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    project_root.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Ok(Some(path))
            }
            None => {
                let default_path = project_root.join(CONFIG_FILE_NAME);
                Ok(default_path.is_file().then_some(default_path))
            }
        }
    }
}
