//! Terminal-backed handles for the command-line front end.

use std::time::Duration;

use async_trait::async_trait;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use super::{Alerts, Label};

/// Prints alerts to stderr.
pub struct ConsoleAlerts {
    term: Term,
}

impl ConsoleAlerts {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for ConsoleAlerts {
    fn default() -> Self {
        Self::new()
    }
}

impl Alerts for ConsoleAlerts {
    fn alert(&self, message: &str) {
        let _ = self
            .term
            .write_line(&format!("{} {}", style("!").red().bold(), message));
    }
}

/// Status label rendered as a spinner; the last text stays on screen.
pub struct SpinnerLabel {
    bar: ProgressBar,
}

impl SpinnerLabel {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
        {
            bar.set_style(spinner_style);
        }
        Self { bar }
    }

    /// Stop ticking, leaving the current text visible.
    pub fn finish(&self) {
        if !self.bar.is_finished() && !self.bar.message().is_empty() {
            self.bar.finish();
        }
    }
}

impl Default for SpinnerLabel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Label for SpinnerLabel {
    async fn set_text(&self, text: &str) {
        self.bar.set_message(text.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }
}

impl Drop for SpinnerLabel {
    fn drop(&mut self) {
        self.finish();
    }
}
