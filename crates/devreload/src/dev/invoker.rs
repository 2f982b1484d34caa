//! Runs the external bundler, one process at a time.
//!
//! Builds are blocking calls: the watcher thread that accepted a change
//! waits for the bundler to exit. A mutex serializes callers, so two
//! accepted changes queue up instead of racing each other on the output
//! directory.

use crate::config::BundlerConfig;
use crate::dev::message::EncodedError;
use crate::dev::state::SharedState;
use crate::error::BuildError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Captured result of one bundler run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundlerOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
}

/// Something that can run one build to completion.
pub trait Bundler: Send + Sync {
    /// Run the build and block until it finishes.
    fn run(&self) -> Result<BundlerOutput, BuildError>;

    /// Human-readable command line, for logs.
    fn describe(&self) -> String;
}

/// Spawns `program args...` in the project root.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandBundler {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }

    /// Bundler for watch builds (`release == false`) or production builds.
    pub fn from_config(config: &BundlerConfig, release: bool, cwd: &Path) -> Self {
        let args = if release {
            config.release_args.clone()
        } else {
            config.debug_args.clone()
        };
        Self::new(config.program.clone(), args, cwd)
    }
}

impl Bundler for CommandBundler {
    fn run(&self) -> Result<BundlerOutput, BuildError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BuildError::Launch {
                program: self.program.clone(),
                source,
            })?;

        Ok(BundlerOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Stderr text of a failed build, if the error marker is present.
///
/// Only stderr counts; the exit code is not interpreted.
pub fn reported_error<'a>(output: &'a BundlerOutput, marker: &str) -> Option<&'a str> {
    output
        .stderr
        .contains(marker)
        .then_some(output.stderr.as_str())
}

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub duration: Duration,
    /// Encoded error text when the build failed or could not be launched
    pub error: Option<EncodedError>,
    pub exit_code: Option<i32>,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Serialized access to the bundler, feeding the reload buffers.
pub struct BuildInvoker {
    bundler: Box<dyn Bundler>,
    error_marker: String,
    state: SharedState,
    lock: Mutex<()>,
}

impl BuildInvoker {
    pub fn new(
        bundler: impl Bundler + 'static,
        error_marker: impl Into<String>,
        state: SharedState,
    ) -> Self {
        Self {
            bundler: Box::new(bundler),
            error_marker: error_marker.into(),
            state,
            lock: Mutex::new(()),
        }
    }

    /// Run a build not tied to a file change (startup build).
    ///
    /// A failure is queued for the next tick; success queues nothing.
    pub fn run_build(&self) -> BuildReport {
        let _guard = self.lock.lock();
        let report = self.execute();
        if let Some(error) = &report.error {
            self.state.buffers.push_error(error.clone());
        }
        report
    }

    /// Rebuild after `path` changed and record the outcome for the broadcaster.
    pub fn rebuild_for(&self, path: &Path) -> BuildReport {
        let _guard = self.lock.lock();
        let report = self.execute();
        self.state
            .buffers
            .record(path.to_path_buf(), report.error.clone());
        report
    }

    fn execute(&self) -> BuildReport {
        self.state.start_build();
        tracing::debug!("Running {}", self.bundler.describe());

        let start = Instant::now();
        let (failure, exit_code) = match self.bundler.run() {
            Ok(output) => {
                if !output.stdout.trim().is_empty() {
                    tracing::debug!("bundler stdout:\n{}", output.stdout.trim_end());
                }
                tracing::debug!("bundler exited with {:?}", output.exit_code);

                let failure = reported_error(&output, &self.error_marker).map(str::to_string);
                if failure.is_none() && !output.stderr.trim().is_empty() {
                    tracing::debug!("bundler stderr:\n{}", output.stderr.trim_end());
                }
                (failure, output.exit_code)
            }
            Err(err) => (Some(err.to_string()), None),
        };
        let duration = start.elapsed();

        match &failure {
            Some(text) => {
                tracing::warn!("Build failed:\n{}", text.trim_end());
                self.state.fail_build(text.clone());
            }
            None => {
                tracing::debug!("Build finished in {:?}", duration);
                self.state.complete_build(duration_ms(duration));
            }
        }

        BuildReport {
            duration,
            error: failure.as_deref().map(EncodedError::encode),
            exit_code,
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
