//! Shared utilities for command implementations.

use crate::error::{CliError, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Resolve a path relative to a working directory.
///
/// If the path is absolute, returns it unchanged. Otherwise, joins it with
/// the working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Project root from `--cwd`, or the current directory.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if the resolved path is not a directory.
pub fn resolve_project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current =
        std::env::current_dir().with_hint("Pass --cwd to choose the project root")?;
    let root = match cwd {
        Some(path) => resolve_path(path, &current),
        None => current,
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Project root is not a directory: {}",
            root.display()
        )));
    }

    Ok(root)
}

/// Whether a bundler argument names a script file.
pub fn is_script_arg(arg: &str) -> bool {
    let ext = Path::new(arg)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    matches!(ext, "js" | "mjs" | "cjs" | "ts")
}
