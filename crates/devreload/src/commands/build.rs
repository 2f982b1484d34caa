//! One-shot bundler run.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::{ConfigOverrides, DevReloadConfig};
use crate::dev::invoker::reported_error;
use crate::dev::{Bundler, CommandBundler};
use crate::error::{BuildError, CliError, Result};
use crate::ui::Spinner;
use std::time::Instant;

/// Execute the build command.
///
/// Runs the debug script, or the production script with `--release`, and
/// fails when the bundler prints the error marker on stderr.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let project_root = utils::resolve_project_root(args.project.cwd.as_deref())?;
    let config = DevReloadConfig::load(
        &project_root,
        args.project.config.as_deref(),
        &ConfigOverrides::default(),
    )?;
    config.validate()?;

    let bundler = CommandBundler::from_config(&config.bundler, args.release, &project_root);
    let mode = if args.release { "release" } else { "debug" };
    let spinner = Spinner::new(&format!("Running {} ({})", bundler.describe(), mode));

    let start = Instant::now();
    let output = tokio::task::spawn_blocking(move || bundler.run())
        .await
        .map_err(|e| CliError::Custom(format!("Bundler task failed: {}", e)))?;

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            spinner.fail("Bundler could not be started");
            return Err(e.into());
        }
    };

    if !output.stdout.trim().is_empty() {
        tracing::debug!("bundler stdout:\n{}", output.stdout.trim_end());
    }

    if let Some(text) = reported_error(&output, &config.bundler.error_marker) {
        spinner.fail("Build failed");
        return Err(BuildError::Reported {
            output: text.trim_end().to_string(),
        }
        .into());
    }

    spinner.finish(&format!(
        "Build completed in {}ms",
        start.elapsed().as_millis()
    ));
    Ok(())
}
