#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::{CliError, ConfigError};
    use serial_test::serial;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_site_layout() {
        let config = DevReloadConfig::default();
        assert_eq!(config.web_root, PathBuf::from("wwwroot"));
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.output_dir, PathBuf::from("bundles"));
        assert_eq!(config.extensions, vec!["js", "scss", "css"]);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.sse_path, "/sse");
        assert_eq!(config.bundler.program, "node");
        assert_eq!(config.bundler.debug_args, vec!["build.debug.js"]);
        assert_eq!(config.bundler.release_args, vec!["build.prod.js"]);
        assert_eq!(config.bundler.error_marker, "[ERROR]");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DevReloadConfig =
            serde_json::from_str(r#"{ "port": 8080, "bundler": { "program": "npx" } }"#).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bundler.program, "npx");
        assert_eq!(config.bundler.error_marker, "[ERROR]");
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<DevReloadConfig, _> = serde_json::from_str(r#"{ "prot": 8080 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        let base = DevReloadConfig::default();

        let zero_poll = DevReloadConfig {
            poll_interval_ms: 0,
            ..base.clone()
        };
        assert!(zero_poll.validate().is_err());

        let relative_sse = DevReloadConfig {
            sse_path: "sse".to_string(),
            ..base.clone()
        };
        assert!(relative_sse.validate().is_err());

        let reserved_sse = DevReloadConfig {
            sse_path: "/__devreload__/events".to_string(),
            ..base.clone()
        };
        assert!(reserved_sse.validate().is_err());

        let dotted = DevReloadConfig {
            extensions: vec![".js".to_string()],
            ..base.clone()
        };
        match dotted.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "extensions"),
            other => panic!("unexpected: {:?}", other),
        }

        let no_marker = DevReloadConfig {
            bundler: BundlerConfig {
                error_marker: String::new(),
                ..BundlerConfig::default()
            },
            ..base
        };
        assert!(no_marker.validate().is_err());
    }

    #[test]
    fn test_validate_layout() {
        let temp = TempDir::new().unwrap();
        let config = DevReloadConfig::default();

        assert!(matches!(
            config.validate_layout(temp.path()),
            Err(ConfigError::MissingDirectory { ref field, .. }) if field == "web_root"
        ));

        fs::create_dir_all(temp.path().join("wwwroot")).unwrap();
        assert!(matches!(
            config.validate_layout(temp.path()),
            Err(ConfigError::MissingDirectory { ref field, .. }) if field == "assets_dir"
        ));

        fs::create_dir_all(temp.path().join("wwwroot/assets")).unwrap();
        assert!(config.validate_layout(temp.path()).is_ok());
    }

    #[test]
    #[serial]
    fn test_load_priority_file_env_cli() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{ "port": 7000, "debounce_ms": 300, "sse_path": "/events" }"#,
        )
        .unwrap();

        unsafe { std::env::set_var("DEVRELOAD_DEBOUNCE_MS", "700") };
        let overrides = ConfigOverrides {
            port: Some(9000),
            ..ConfigOverrides::default()
        };
        let result = DevReloadConfig::load(temp.path(), None, &overrides);
        unsafe { std::env::remove_var("DEVRELOAD_DEBOUNCE_MS") };

        let config = result.unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.debounce_ms, 700);
        assert_eq!(config.sse_path, "/events");
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    #[serial]
    fn test_load_nested_env() {
        let temp = TempDir::new().unwrap();
        unsafe { std::env::set_var("DEVRELOAD_BUNDLER__PROGRAM", "bun") };
        let result = DevReloadConfig::load(temp.path(), None, &ConfigOverrides::default());
        unsafe { std::env::remove_var("DEVRELOAD_BUNDLER__PROGRAM") };

        let config = result.unwrap();
        assert_eq!(config.bundler.program, "bun");
        assert_eq!(config.bundler.debug_args, vec!["build.debug.js"]);
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let result = DevReloadConfig::load(
            temp.path(),
            Some(std::path::Path::new("missing.json")),
            &ConfigOverrides::default(),
        );
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::NotFound(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_load_invalid_json_type() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), r#"{ "port": "eighty" }"#).unwrap();
        let result = DevReloadConfig::load(temp.path(), None, &ConfigOverrides::default());
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::Extract(_)))
        ));
    }

    #[test]
    fn test_json_schema_lists_fields() {
        let schema = DevReloadConfig::json_schema();
        let text = schema.to_string();
        assert!(text.contains("debounce_ms"));
        assert!(text.contains("error_marker"));
    }
}
