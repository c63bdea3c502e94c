//! Shared test utilities

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{MergePrCall, MockPlatformService, UpdateBaseCall};

use async_trait::async_trait;
use prchain::progress::ProgressCallback;
use prchain::types::{PrRef, PrState, PullRequest};
use std::sync::Mutex;

/// Create an open, mergeable PR authored by `alice`
pub fn make_pr(number: u64, head: (&str, &str), base: (&str, &str)) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        title: format!("PR {number}"),
        body: Some(format!("PR {number} body")),
        head: PrRef {
            name: head.0.to_string(),
            sha: head.1.to_string(),
        },
        base: PrRef {
            name: base.0.to_string(),
            sha: base.1.to_string(),
        },
        mergeable: Some(true),
        merged: false,
        state: PrState::Open,
        is_draft: false,
        author: "alice".to_string(),
    }
}

/// `make_pr` with a different author
pub fn make_pr_by(
    author: &str,
    number: u64,
    head: (&str, &str),
    base: (&str, &str),
) -> PullRequest {
    PullRequest {
        author: author.to_string(),
        ..make_pr(number, head, base)
    }
}

/// Two-link stack used by merge tests:
///
/// ```text
/// master: m0 <- a1 (feat1, PR 10) <- b1 (feat2, PR 11)
/// ```
pub fn two_link_stack() -> MockPlatformService {
    let mock = MockPlatformService::new();
    mock.add_commit_with_parents("m0", &[], "root");
    mock.add_linear_history("m0", &["a1", "b1"]);
    mock.add_branch("master", "m0");
    mock.add_branch("feat1", "a1");
    mock.add_branch("feat2", "b1");
    mock.add_pr(make_pr(10, ("feat1", "a1"), ("master", "m0")));
    mock.add_pr(make_pr(11, ("feat2", "b1"), ("feat1", "a1")));
    mock
}

/// Progress sink that keeps every message
#[derive(Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
    waits: Mutex<Vec<(u64, u32)>>,
}

impl RecordingProgress {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn waits(&self) -> Vec<(u64, u32)> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    async fn on_waiting(&self, number: u64, attempt: u32) {
        self.waits.lock().unwrap().push((number, attempt));
    }
}
