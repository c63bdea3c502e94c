//! Progress reporting for long-running operations
//!
//! Library code reports user-facing progress through [`ProgressCallback`] so
//! the CLI can render it while tests stay silent.

use async_trait::async_trait;

/// Receives human-readable progress updates
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A status line (created PR, merged PR, dry-run notice, ...)
    async fn on_message(&self, message: &str);

    /// Waiting on CI for a PR; called once per poll that returned pending
    async fn on_waiting(&self, number: u64, attempt: u32) {
        let _ = (number, attempt);
    }
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}
}
