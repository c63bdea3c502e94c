//! Progress rendering for CLI commands

use crate::cli::style::{arrow, spinner_style};
use anstream::eprintln;
use async_trait::async_trait;
use indicatif::ProgressBar;
use prchain::progress::ProgressCallback;
use std::sync::Mutex;
use std::time::Duration;

/// Prints progress lines to stderr and shows a spinner while CI is pending
#[derive(Default)]
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a progress renderer
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(spinner) = guard.take()
        {
            spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        self.clear_spinner();
        eprintln!("{} {message}", arrow());
    }

    async fn on_waiting(&self, number: u64, attempt: u32) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let spinner = guard.get_or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(spinner_style());
            spinner.enable_steady_tick(Duration::from_millis(80));
            spinner
        });
        spinner.set_message(format!("Waiting for CI on PR #{number} (poll {attempt})"));
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
