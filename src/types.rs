//! Core types for prchain
//!
//! All of these are point-in-time snapshots fetched from the hosting platform
//! on every run. Nothing here is persisted.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Splits a commit message into title and body at the first run of newlines.
static MESSAGE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));

/// A commit object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Parent commit SHAs, in order
    pub parents: Vec<String>,
}

impl Commit {
    /// First line of the message
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Split the message into `(title, body)`.
    ///
    /// Returns `None` when the message has no non-empty body after the title.
    pub fn title_and_body(&self) -> Option<(&str, &str)> {
        let mut parts = MESSAGE_SPLIT.splitn(&self.message, 2);
        let title = parts.next()?;
        let body = parts.next()?;
        if body.trim().is_empty() {
            return None;
        }
        Some((title, body))
    }
}

/// A branch on the hosting platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    /// Branch name
    pub name: String,
    /// SHA of the branch head commit
    pub sha: String,
}

/// One side (head or base) of a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrRef {
    /// Branch name
    pub name: String,
    /// Commit SHA the branch pointed at when last computed by the host
    pub sha: String,
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// A pull request
///
/// Chain identity is the head SHA, not the number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
    /// Head branch
    pub head: PrRef,
    /// Base branch
    pub base: PrRef,
    /// Whether PR can be merged (no conflicts)
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (still being computed)
    pub mergeable: Option<bool>,
    /// Whether the PR has been merged
    pub merged: bool,
    /// Current state of the PR
    pub state: PrState,
    /// Whether PR is a draft
    pub is_draft: bool,
    /// Login of the PR author
    pub author: String,
}

/// Normalized combined CI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CiState {
    /// Checks still running
    Pending,
    /// All checks passed (or none configured)
    Success,
    /// At least one check failed or errored
    Failure,
}

impl CiState {
    /// Normalize a GitHub combined-status state string.
    ///
    /// `error` and unknown values count as failures.
    pub fn from_github(state: &str) -> Self {
        match state {
            "pending" => Self::Pending,
            "success" => Self::Success,
            _ => Self::Failure,
        }
    }
}

impl std::fmt::Display for CiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Aggregate CI status for a ref
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedStatus {
    /// Normalized state
    pub state: CiState,
    /// Number of individual statuses reported
    pub total_count: u32,
}

/// Parameters for creating a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// PR title
    pub title: String,
    /// Head branch name
    pub head: String,
    /// Base branch name
    pub base: String,
    /// PR body
    pub body: String,
    /// Create as draft
    pub draft: bool,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Squash all commits into one
    #[default]
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

impl std::str::FromStr for MergeMethod {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squash" => Ok(Self::Squash),
            "merge" => Ok(Self::Merge),
            "rebase" => Ok(Self::Rebase),
            other => Err(crate::error::Error::InvalidArgument(format!(
                "merge method must be one of merge, rebase, squash (got '{other}')"
            ))),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API base URL
    pub api_url: url::Url,
    /// Upload API base URL
    pub upload_url: url::Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(message: &str) -> Commit {
        Commit {
            sha: "abc".to_string(),
            message: message.to_string(),
            parents: vec!["parent".to_string()],
        }
    }

    #[test]
    fn test_title_and_body_with_blank_line() {
        let c = commit("Add parser\n\nParses the thing.\n\nMore detail.");
        assert_eq!(
            c.title_and_body(),
            Some(("Add parser", "Parses the thing.\n\nMore detail."))
        );
    }

    #[test]
    fn test_title_and_body_without_body() {
        assert_eq!(commit("Just a title").title_and_body(), None);
        assert_eq!(commit("Just a title\n\n").title_and_body(), None);
    }

    #[test]
    fn test_title_is_first_line() {
        assert_eq!(commit("Title\nbody").title(), "Title");
        assert_eq!(commit("").title(), "");
    }

    #[test]
    fn test_ci_state_normalization() {
        assert_eq!(CiState::from_github("pending"), CiState::Pending);
        assert_eq!(CiState::from_github("success"), CiState::Success);
        assert_eq!(CiState::from_github("failure"), CiState::Failure);
        assert_eq!(CiState::from_github("error"), CiState::Failure);
    }

    #[test]
    fn test_merge_method_parse() {
        assert_eq!("rebase".parse::<MergeMethod>().unwrap(), MergeMethod::Rebase);
        assert!("fast-forward".parse::<MergeMethod>().is_err());
        assert_eq!(MergeMethod::default(), MergeMethod::Squash);
    }
}
