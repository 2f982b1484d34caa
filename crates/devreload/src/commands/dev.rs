//! Development host command implementation.
//!
//! Orchestrates the dev host lifecycle:
//! - Optional initial build
//! - File watching with per-path debouncing
//! - Broadcaster tick loop
//! - HTTP server with the event stream
//! - Graceful shutdown on Ctrl+C

use crate::cli::DevArgs;
use crate::commands::utils;
use crate::config::DevReloadConfig;
use crate::dev::{
    AssetWatcher, Broadcaster, BuildInvoker, ChangeTracker, CommandBundler, DevConfig, DevServer,
    DevState, SharedState,
};
use crate::error::{CliError, Result, ResultExt};
use crate::ui::{self, Spinner};
use std::future::Future;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;

/// Execute the dev command.
///
/// # Process Flow
///
/// 1. Load and resolve configuration
/// 2. Run the initial build (unless disabled); failures are shown, not fatal
/// 3. Start the asset watcher, which rebuilds on the notify thread
/// 4. Start the broadcaster and the HTTP server
/// 5. Wait for Ctrl+C, then stop the server and broadcaster and close streams
///
/// # Errors
///
/// Returns errors for invalid configuration, watcher setup and server startup.
pub async fn execute(args: DevArgs) -> Result<()> {
    ui::info("Starting development server...");

    let project_root = utils::resolve_project_root(args.project.cwd.as_deref())?;
    let base = DevReloadConfig::load(
        &project_root,
        args.project.config.as_deref(),
        &args.overrides(),
    )?;
    let config = DevConfig::resolve(base, &project_root)?;

    ui::info(&format!("Web root: {}", config.web_root.display()));

    let state: SharedState = Arc::new(DevState::new(config.base.client_buffer));
    let bundler = CommandBundler::from_config(&config.base.bundler, false, &config.project_root);
    let invoker = Arc::new(BuildInvoker::new(
        bundler,
        config.base.bundler.error_marker.clone(),
        Arc::clone(&state),
    ));

    if config.base.build_on_start {
        initial_build(Arc::clone(&invoker)).await?;
    }

    let tracker = Arc::new(ChangeTracker::new(config.tracker_policy(), invoker));
    let watcher = AssetWatcher::start(config.watch_root.clone(), tracker)
        .context("Failed to start asset watcher")?;
    ui::info(&format!(
        "Watching for changes in: {}",
        watcher.root().display()
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let broadcaster = Broadcaster::new(Arc::clone(&state), config.base.poll_interval());
    let broadcaster_handle = tokio::spawn(broadcaster.run(shutdown_signal(shutdown_rx.clone())));

    let server = DevServer::new(config.clone(), Arc::clone(&state));
    let mut server_handle = tokio::spawn(server.start(shutdown_signal(shutdown_rx)));

    if config.base.open {
        open_browser(&config.server_url());
    }

    ui::info("Press Ctrl+C to stop");

    let finished = tokio::select! {
        _ = signal::ctrl_c() => {
            ui::info("Shutting down development server...");
            None
        }
        joined = &mut server_handle => Some(joined),
    };

    let _ = shutdown_tx.send(true);
    // Open streams would otherwise hold graceful shutdown forever.
    let closed = state.clients.close_all();
    tracing::debug!("Closed {} open stream(s)", closed);

    let _ = broadcaster_handle.await;
    let joined = match finished {
        Some(joined) => joined,
        None => server_handle.await,
    };
    drop(watcher);

    joined.map_err(|e| CliError::Server(format!("Server task failed: {}", e)))??;

    ui::success("Development server stopped");
    Ok(())
}

/// Run the bundler once before serving.
async fn initial_build(invoker: Arc<BuildInvoker>) -> Result<()> {
    let spinner = Spinner::new("Running initial build...");

    let report = tokio::task::spawn_blocking(move || invoker.run_build())
        .await
        .map_err(|e| CliError::Custom(format!("Initial build task failed: {}", e)))?;

    match report.error {
        None => spinner.finish(&format!(
            "Initial build completed in {}ms",
            report.duration.as_millis()
        )),
        Some(error) => {
            spinner.fail("Initial build failed");
            let text = error.decode().unwrap_or_else(|_| error.to_string());
            ui::error(text.trim_end());
        }
    }

    Ok(())
}

/// Resolves once `true` is published on the shutdown channel.
fn shutdown_signal(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

/// Open the server URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_signal_waits_for_true() {
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(shutdown_signal(rx));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("signal resolves")
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_signal_resolves_when_sender_dropped() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), shutdown_signal(rx))
            .await
            .expect("signal resolves");
    }
}
