//! Check command implementation.
//!
//! Validates configuration and the site layout without starting anything.

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::config::{ConfigOverrides, DevReloadConfig};
use crate::error::Result;
use crate::ui;
use std::path::Path;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load devreload.json and `DEVRELOAD_*` overrides
/// 2. Validate field values
/// 3. Check that the web root and assets tree exist
/// 4. Warn about bundler scripts that are missing
///
/// With `--schema`, prints the config file's JSON schema instead.
pub async fn execute(args: CheckArgs) -> Result<()> {
    if args.schema {
        let schema = serde_json::to_string_pretty(&DevReloadConfig::json_schema())?;
        println!("{}", schema);
        return Ok(());
    }

    ui::info("Checking configuration...");

    let project_root = utils::resolve_project_root(args.project.cwd.as_deref())?;
    let config = DevReloadConfig::load(
        &project_root,
        args.project.config.as_deref(),
        &ConfigOverrides::default(),
    )?;
    config.validate()?;
    ui::success("Configuration is valid!");

    ui::info("Checking site layout...");
    config.validate_layout(&project_root)?;
    let web_root = project_root.join(&config.web_root);
    ui::success(&format!("  {} exists", web_root.display()));
    ui::success(&format!(
        "  {} exists",
        web_root.join(&config.assets_dir).display()
    ));

    check_bundler_scripts(&config, &project_root);

    ui::success("All checks passed!");
    Ok(())
}

/// Warn about script arguments that don't exist. The bundler itself is not run.
fn check_bundler_scripts(config: &DevReloadConfig, project_root: &Path) {
    let scripts = [
        ("debug", &config.bundler.debug_args),
        ("release", &config.bundler.release_args),
    ];

    for (mode, args) in scripts {
        for script in args.iter().filter(|a| utils::is_script_arg(a)) {
            let path = utils::resolve_path(Path::new(script), project_root);
            if path.is_file() {
                ui::success(&format!("  {} script {} exists", mode, script));
            } else {
                ui::warning(&format!(
                    "{} build script not found: {}",
                    mode,
                    path.display()
                ));
            }
        }
    }
}
