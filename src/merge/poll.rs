//! CI status polling

use crate::error::{Error, Result, ResultExt};
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use crate::types::CiState;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default wait between polls of a pending status
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// How long to wait for a pending CI status
///
/// With no bounds set, pending statuses are re-polled until they settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Sleep between polls
    pub interval: Duration,
    /// Give up after this many polls
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed since the first poll
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            timeout: None,
        }
    }
}

impl PollPolicy {
    /// Poll without sleeping, at most `max_attempts` times
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            interval: Duration::ZERO,
            max_attempts: Some(max_attempts),
            timeout: None,
        }
    }

    fn exhausted(&self, attempts: u32, started: Instant) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.timeout.is_some_and(|limit| started.elapsed() >= limit)
    }
}

/// Poll the combined status of `git_ref` until it is no longer pending.
///
/// With `force` the first result is returned even if pending. Otherwise a
/// pending status that outlives the policy's bounds is `StatusPending`.
pub async fn wait_for_status(
    platform: &dyn PlatformService,
    number: u64,
    git_ref: &str,
    policy: &PollPolicy,
    force: bool,
    progress: &dyn ProgressCallback,
) -> Result<CiState> {
    let started = Instant::now();
    let mut attempts = 0;

    loop {
        let status = platform
            .combined_status(git_ref)
            .await
            .with_context(|| format!("failed to get combined status for {git_ref}"))?;
        attempts += 1;
        debug!(number, git_ref, state = %status.state, attempts, "polled status");

        if status.state != CiState::Pending {
            return Ok(status.state);
        }
        if force {
            warn!(number, "status is pending, not waiting because force was specified");
            return Ok(CiState::Pending);
        }
        if policy.exhausted(attempts, started) {
            return Err(Error::StatusPending { number, attempts });
        }

        warn!(
            number,
            wait_secs = policy.interval.as_secs(),
            "status is pending, waiting"
        );
        progress.on_waiting(number, attempts).await;
        tokio::time::sleep(policy.interval).await;
    }
}
