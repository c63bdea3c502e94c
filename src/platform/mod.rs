//! Hosting platform services
//!
//! Provides the repository operations the chain and merge logic consume.

mod endpoints;
mod github;

pub use endpoints::{DEFAULT_API_URL, DEFAULT_UPLOAD_URL, resolve_endpoints};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    Branch, CombinedStatus, Commit, MergeMethod, MergeResult, NewPullRequest, PullRequest,
};
use async_trait::async_trait;

/// Platform service trait for repository operations
///
/// The same chain, creation and merge logic runs against any implementation:
/// the GitHub REST client in production and in-memory fixtures in tests.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List all branches of the repository.
    ///
    /// Entries carry only name and head SHA.
    async fn list_branches(&self) -> Result<Vec<Branch>>;

    /// Get one branch by name
    async fn get_branch(&self, name: &str) -> Result<Branch>;

    /// List open pull requests.
    ///
    /// List results are not guaranteed to have every field populated
    /// (notably `mergeable`); use [`get_pull_request`] for a full record.
    ///
    /// [`get_pull_request`]: Self::get_pull_request
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>>;

    /// Get full PR details by number
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest>;

    /// Get a commit object by SHA
    async fn get_commit(&self, sha: &str) -> Result<Commit>;

    /// Get the combined CI status for a ref (branch name or SHA)
    async fn combined_status(&self, git_ref: &str) -> Result<CombinedStatus>;

    /// Create a pull request
    async fn create_pull_request(&self, pr: &NewPullRequest) -> Result<PullRequest>;

    /// Update the base branch of an existing PR
    async fn update_pr_base(&self, number: u64, new_base: &str) -> Result<PullRequest>;

    /// Merge a PR.
    ///
    /// `head_sha` guards against the head moving between read and merge.
    async fn merge_pr(
        &self,
        number: u64,
        head_sha: &str,
        method: MergeMethod,
        message: &str,
    ) -> Result<MergeResult>;
}
