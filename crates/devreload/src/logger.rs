//! Logging setup for devreload.
//!
//! Structured logging on the `tracing` ecosystem. The watcher thread, the
//! broadcaster task and every SSE connection log through the same
//! subscriber, so `RUST_LOG=devreload=debug` shows the whole reload
//! pipeline in order.
//!
//! # Example
//!
//! ```rust,no_run
//! use devreload::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Watching wwwroot/assets");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "devreload=debug,tower_http=debug";

/// Filter used with `--quiet`.
pub const QUIET_FILTER: &str = "devreload=error";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "devreload=info";

/// Initialize the tracing subscriber.
///
/// Call once at the start of the program.
///
/// The logging level is determined in this order:
/// 1. `--verbose`: DEBUG for devreload
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG` environment variable
/// 4. Default: INFO for devreload
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(select_filter(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_parse() {
        let _ = EnvFilter::new(VERBOSE_FILTER);
        let _ = EnvFilter::new(QUIET_FILTER);
        let _ = EnvFilter::new(DEFAULT_FILTER);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
