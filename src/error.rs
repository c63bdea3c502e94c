//! Error types for prchain
//!
//! Every failure carries an [`ErrorKind`] so callers can branch on the kind of
//! failure (for example to decide whether `--force` applies) without matching
//! on message text. Operational context is layered with [`ResultExt::context`].

use thiserror::Error;

/// Failure classification used for policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Commit walk exceeded its hop limit
    ChainTooLong,
    /// A commit on the walked path did not have exactly one parent
    NonLinearHistory,
    /// Two pull requests are stacked on the same commit
    NonLinearDependency,
    /// A commit maps to a number of branches that cannot be disambiguated
    AmbiguousBranch,
    /// A commit message has no body to use as PR description
    MalformedCommitMessage,
    /// The per-run creation cap was reached
    CreateLimitExceeded,
    /// Combined CI status is failing
    StatusFailure,
    /// Combined CI status stayed pending past the poll policy bounds
    StatusPending,
    /// PR base no longer matches the expected base branch
    StaleBase,
    /// The hosting platform refused the merge
    MergeFailed,
    /// Operation requires a merged PR
    NotMerged,
    /// Fetching a commit object failed
    CommitFetchFailed,
    /// A branch, pull request or commit does not exist
    NotFound,
    /// Transport or API failure talking to the hosting platform
    Api,
    /// Authentication could not be established
    Auth,
    /// Invalid configuration file or endpoint
    Config,
    /// Invalid command-line argument
    InvalidArgument,
    /// Local IO failure
    Io,
}

impl ErrorKind {
    /// Whether `--force` may downgrade this failure to a warning.
    ///
    /// Structural failures are never forceable.
    pub const fn is_forceable(self) -> bool {
        matches!(self, Self::StatusFailure | Self::StaleBase)
    }
}

/// Main error type for prchain operations
#[derive(Error, Debug)]
pub enum Error {
    /// Commit walk hit its hop limit before reaching the end commit
    #[error("commit chain from {start} does not reach {end} within {limit} commits")]
    ChainTooLong {
        /// Walk start
        start: String,
        /// Walk end
        end: String,
        /// Hop limit
        limit: usize,
    },

    /// Merge commit (or root commit) encountered while walking history
    #[error("commit {sha} has {parents} parents, only linear history is supported")]
    NonLinearHistory {
        /// Offending commit
        sha: String,
        /// Parent count found
        parents: usize,
    },

    /// Branching PR stack
    #[error("only linear dependencies are supported, but {first} and {second} both depend on {base}")]
    NonLinearDependency {
        /// Shared base SHA
        base: String,
        /// Head SHA of the first dependent seen
        first: String,
        /// Head SHA of the second dependent seen
        second: String,
    },

    /// Branch resolution for a commit failed
    #[error("commit {sha} has {} branches ({}), expected 1 or 2", .candidates.len(), .candidates.join(", "))]
    AmbiguousBranch {
        /// Commit SHA
        sha: String,
        /// Branch names pointing at the commit
        candidates: Vec<String>,
    },

    /// Commit message without body
    #[error("commit {sha} message has no body to use as pull request description")]
    MalformedCommitMessage {
        /// Commit SHA
        sha: String,
    },

    /// Creation cap reached
    #[error("maximum number of pull requests ({limit}) created, not creating one for branch {branch}")]
    CreateLimitExceeded {
        /// Configured cap
        limit: usize,
        /// Branch that would have been next
        branch: String,
    },

    /// CI failing
    #[error("PR #{number} cannot be merged because its status is {state}")]
    StatusFailure {
        /// PR number
        number: u64,
        /// Reported state
        state: String,
    },

    /// CI still pending after the poll policy gave up
    #[error("PR #{number} status still pending after {attempts} polls")]
    StatusPending {
        /// PR number
        number: u64,
        /// Polls performed
        attempts: u32,
    },

    /// Base ref or SHA mismatch
    #[error("PR #{number} base {field} ({actual}) does not match base branch {field} ({expected})")]
    StaleBase {
        /// PR number
        number: u64,
        /// "ref" or "SHA"
        field: &'static str,
        /// Value recorded on the PR
        actual: String,
        /// Value of the base branch
        expected: String,
    },

    /// Merge rejected
    #[error("merge of PR #{number} failed: {message}")]
    MergeFailed {
        /// PR number
        number: u64,
        /// Platform message
        message: String,
    },

    /// PR not merged
    #[error("PR #{0} has not been merged")]
    NotMerged(u64),

    /// Commit fetch failed
    #[error("failed to fetch commit {sha}")]
    CommitFetchFailed {
        /// Commit SHA
        sha: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Branch not found
    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    /// Pull request not found
    #[error("pull request #{0} not found")]
    PullRequestNotFound(u64),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid command-line argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Octocrab (GitHub) error
    #[error("GitHub client error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// An error annotated with what was being attempted
    #[error("{context}")]
    Context {
        /// What was being attempted
        context: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Classify this error, looking through context layers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChainTooLong { .. } => ErrorKind::ChainTooLong,
            Self::NonLinearHistory { .. } => ErrorKind::NonLinearHistory,
            Self::NonLinearDependency { .. } => ErrorKind::NonLinearDependency,
            Self::AmbiguousBranch { .. } => ErrorKind::AmbiguousBranch,
            Self::MalformedCommitMessage { .. } => ErrorKind::MalformedCommitMessage,
            Self::CreateLimitExceeded { .. } => ErrorKind::CreateLimitExceeded,
            Self::StatusFailure { .. } => ErrorKind::StatusFailure,
            Self::StatusPending { .. } => ErrorKind::StatusPending,
            Self::StaleBase { .. } => ErrorKind::StaleBase,
            Self::MergeFailed { .. } => ErrorKind::MergeFailed,
            Self::NotMerged(_) => ErrorKind::NotMerged,
            Self::CommitFetchFailed { .. } => ErrorKind::CommitFetchFailed,
            Self::BranchNotFound(_) | Self::PullRequestNotFound(_) => ErrorKind::NotFound,
            Self::GitHubApi(_)
            | Self::Http(_)
            | Self::Json(_)
            | Self::UrlParse(_)
            | Self::Octocrab(_) => ErrorKind::Api,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Config(_) => ErrorKind::Config,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Io(_) => ErrorKind::Io,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// Wrap this error with a description of the failed operation.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for prchain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Attach context to the error side of a [`Result`].
pub trait ResultExt<T> {
    /// Wrap any error with a fixed context message.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Wrap any error with a lazily built context message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Self {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Self {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_looks_through_context() {
        let err = Error::StaleBase {
            number: 7,
            field: "SHA",
            actual: "abc".to_string(),
            expected: "def".to_string(),
        }
        .context("landing chain")
        .context("land failed");

        assert_eq!(err.kind(), ErrorKind::StaleBase);
        assert!(err.kind().is_forceable());
        assert_eq!(err.to_string(), "land failed");
        assert_eq!(err.source().unwrap().to_string(), "landing chain");
    }

    #[test]
    fn test_structural_kinds_not_forceable() {
        for kind in [
            ErrorKind::NonLinearHistory,
            ErrorKind::NonLinearDependency,
            ErrorKind::AmbiguousBranch,
            ErrorKind::ChainTooLong,
            ErrorKind::MergeFailed,
        ] {
            assert!(!kind.is_forceable(), "{kind:?} must not be forceable");
        }
        assert!(ErrorKind::StatusFailure.is_forceable());
    }

    #[test]
    fn test_ambiguous_branch_message_lists_candidates() {
        let err = Error::AmbiguousBranch {
            sha: "abc123".to_string(),
            candidates: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "commit abc123 has 3 branches (a, b, c), expected 1 or 2"
        );
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<()> = Err(Error::NotMerged(5));
        let err = result.with_context(|| "rebasing around #5".to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotMerged);
        assert_eq!(err.source().unwrap().to_string(), "PR #5 has not been merged");
    }
}
