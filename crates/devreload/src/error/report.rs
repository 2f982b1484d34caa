//! Miette diagnostic conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::Reported { output } => {
            miette::miette!(
                "Bundler reported errors:\n\n{}\n\nHint: Fix the source and save again; the watcher will rebuild",
                output.trim_end()
            )
        }
        other => miette::miette!("{}", other),
    }
}
