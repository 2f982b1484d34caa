//! Spinner for the one-shot bundler run.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Spinner for tasks without known duration.
///
/// Hidden in CI and when stderr is not a terminal.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒"]);
        pb.set_style(style);
        pb.set_message(message.to_string());

        if Self::should_show() {
            pb.enable_steady_tick(Duration::from_millis(100));
        } else {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        Self { pb }
    }

    /// Whether the spinner should be drawn at all.
    pub fn should_show() -> bool {
        console::user_attended_stderr() && !super::is_ci()
    }

    /// Finish spinner with success message.
    pub fn finish(&self, message: &str) {
        self.pb
            .finish_with_message(format!("{} {}", "✓".green(), message));
    }

    /// Finish spinner with error message.
    pub fn fail(&self, message: &str) {
        self.pb
            .finish_with_message(format!("{} {}", "✗".red(), message));
    }
}
