//! Merge commit messages

use crate::error::{Result, ResultExt};
use crate::graph::{MAX_MESSAGE_COMMITS, walk_commit_chain};
use crate::platform::PlatformService;
use crate::types::{Commit, PullRequest};

/// Compose the merge message for a PR spanning `commits` (oldest first).
///
/// Two or more commits become a bullet list of their full messages, oldest
/// first. Otherwise the PR body is used verbatim.
pub fn compose_message(commits: &[Commit], body: &str) -> String {
    if commits.len() < 2 {
        return body.to_string();
    }
    commits
        .iter()
        .map(|commit| format!("* {}\n\n", commit.message))
        .collect()
}

/// Walk the PR's commits and compose its merge message.
pub async fn merge_message(platform: &dyn PlatformService, pr: &PullRequest) -> Result<String> {
    let commits = walk_commit_chain(platform, &pr.head.sha, &pr.base.sha, MAX_MESSAGE_COMMITS)
        .await
        .with_context(|| format!("failed to build merge message for PR #{}", pr.number))?;
    Ok(compose_message(
        &commits,
        pr.body.as_deref().unwrap_or_default(),
    ))
}
