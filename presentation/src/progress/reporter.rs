//! Progress reporting for resilient invocations

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mend_application::RetryProgressNotifier;
use mend_domain::{ErrorKind, SelfHealedResult};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Reports attempts with a spinner, printing failures above it
pub struct ProgressReporter {
    tool: String,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        let mut guard = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        let spinner = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.set_prefix(self.tool.clone());
            pb.enable_steady_tick(SPINNER_TICK);
            pb
        });
        f(spinner);
    }

    /// Stop the spinner and remove it from the terminal.
    pub fn finish(&self) {
        if let Some(pb) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

impl RetryProgressNotifier for ProgressReporter {
    fn on_attempt(&self, attempt: u32, delay: Option<Duration>) {
        self.with_spinner(|pb| match delay {
            None => pb.set_message(format!("attempt {}", attempt)),
            Some(delay) => pb.set_message(format!(
                "attempt {} (after {} backoff)",
                attempt,
                format_delay(delay)
            )),
        });
    }

    fn on_attempt_failed(&self, attempt: u32, error: &ErrorKind) {
        self.with_spinner(|pb| {
            pb.println(format!(
                "  {} attempt {} failed: {}",
                "x".red(),
                attempt,
                error.description()
            ))
        });
    }

    fn on_recovery(&self, error: &ErrorKind, recovered: bool) {
        if recovered {
            self.with_spinner(|pb| {
                pb.println(format!("  {} recovered from {}", "+".green(), error.label()))
            });
        }
    }

    fn on_self_healed(&self, healed: &SelfHealedResult) {
        self.with_spinner(|pb| {
            pb.println(format!(
                "  {} salvaged partial output ({} part(s) recovered)",
                "~".yellow(),
                healed.successful_parts.len()
            ))
        });
    }

    fn on_exhausted(&self, attempts: u32, error: &ErrorKind) {
        self.with_spinner(|pb| {
            pb.println(format!(
                "  {} giving up after {} attempt(s): {}",
                "x".red().bold(),
                attempts,
                error.label()
            ))
        });
        self.finish();
    }
}

/// Simple line-based progress on stderr (no spinner)
pub struct SimpleProgress;

impl RetryProgressNotifier for SimpleProgress {
    fn on_attempt(&self, attempt: u32, delay: Option<Duration>) {
        match delay {
            None => eprintln!("{} attempt {}", "->".cyan(), attempt),
            Some(delay) => eprintln!(
                "{} attempt {} after {}",
                "->".cyan(),
                attempt,
                format_delay(delay)
            ),
        }
    }

    fn on_attempt_failed(&self, attempt: u32, error: &ErrorKind) {
        eprintln!("  {} attempt {}: {}", "x".red(), attempt, error.description());
    }

    fn on_recovery(&self, error: &ErrorKind, recovered: bool) {
        let mark = if recovered { "+".green() } else { "-".dimmed() };
        eprintln!("  {} recovery for {}", mark, error.label());
    }

    fn on_self_healed(&self, _healed: &SelfHealedResult) {
        eprintln!("  {} partial result recovered", "~".yellow());
    }

    fn on_exhausted(&self, attempts: u32, _error: &ErrorKind) {
        eprintln!("  {} failed after {} attempt(s)", "x".red().bold(), attempts);
    }
}

/// Render a backoff delay, e.g. `250ms` or `2.0s`
pub fn format_delay(delay: Duration) -> String {
    if delay < Duration::from_secs(1) {
        format!("{}ms", delay.as_millis())
    } else {
        format!("{:.1}s", delay.as_secs_f64())
    }
}
