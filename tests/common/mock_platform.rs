//! In-memory platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use prchain::error::{Error, Result};
use prchain::platform::PlatformService;
use prchain::types::{
    Branch, CiState, CombinedStatus, Commit, MergeMethod, MergeResult, NewPullRequest, PrRef,
    PrState, PullRequest,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `update_pr_base`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBaseCall {
    pub pr_number: u64,
    pub new_base: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub head_sha: String,
    pub method: MergeMethod,
    pub message: String,
}

#[derive(Default)]
struct State {
    branches: BTreeMap<String, String>,
    commits: HashMap<String, Commit>,
    prs: BTreeMap<u64, PullRequest>,
    statuses: HashMap<String, VecDeque<CiState>>,
    next_pr_number: u64,
    // Call tracking
    get_commit_calls: Vec<String>,
    status_calls: Vec<String>,
    create_pr_calls: Vec<NewPullRequest>,
    update_base_calls: Vec<UpdateBaseCall>,
    merge_pr_calls: Vec<MergePrCall>,
    // Error injection
    error_on_commit: Option<String>,
    error_on_merge: HashMap<u64, String>,
    refuse_merge: HashMap<u64, String>,
}

/// In-memory repository implementing `PlatformService`
///
/// Mutating calls change the fixture the way the host would:
/// - created PRs get the next number and the current branch SHAs
/// - `update_pr_base` points the PR at the new branch's current head
/// - `merge_pr` marks the PR merged and fast-forwards the base branch to
///   the PR head
///
/// Status sequences are consumed one entry per poll; the last entry
/// repeats. Refs without a sequence report success.
pub struct MockPlatformService {
    author: String,
    state: Mutex<State>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Empty repository; created PRs are authored by `alice`
    pub fn new() -> Self {
        Self {
            author: "alice".to_string(),
            state: Mutex::new(State {
                next_pr_number: 1,
                ..State::default()
            }),
        }
    }

    // === Fixture setup ===

    /// Point branch `name` at `sha`
    pub fn add_branch(&self, name: &str, sha: &str) {
        self.state
            .lock()
            .unwrap()
            .branches
            .insert(name.to_string(), sha.to_string());
    }

    /// Add a commit with explicit parents
    pub fn add_commit_with_parents(&self, sha: &str, parents: &[&str], message: &str) {
        self.state.lock().unwrap().commits.insert(
            sha.to_string(),
            Commit {
                sha: sha.to_string(),
                message: message.to_string(),
                parents: parents.iter().map(ToString::to_string).collect(),
            },
        );
    }

    /// Add a single-parent commit
    pub fn add_commit(&self, sha: &str, parent: &str, message: &str) {
        self.add_commit_with_parents(sha, &[parent], message);
    }

    /// Add a linear run of commits on top of `root`, each with a
    /// "`<sha>` title / `<sha>` body" message
    pub fn add_linear_history(&self, root: &str, shas: &[&str]) {
        let mut parent = root;
        for sha in shas {
            self.add_commit(sha, parent, &format!("{sha} title\n\n{sha} body"));
            parent = sha;
        }
    }

    /// Add a PR as-is
    pub fn add_pr(&self, pr: PullRequest) {
        let mut state = self.state.lock().unwrap();
        state.next_pr_number = state.next_pr_number.max(pr.number + 1);
        state.prs.insert(pr.number, pr);
    }

    /// Script the statuses reported for `git_ref`, one per poll
    pub fn set_statuses(&self, git_ref: &str, states: &[CiState]) {
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert(git_ref.to_string(), states.iter().copied().collect());
    }

    // === Error injection methods ===

    /// Make every `get_commit` fail
    pub fn fail_get_commit(&self, msg: &str) {
        self.state.lock().unwrap().error_on_commit = Some(msg.to_string());
    }

    /// Make `merge_pr` for `number` return an error
    pub fn fail_merge(&self, number: u64, msg: &str) {
        self.state
            .lock()
            .unwrap()
            .error_on_merge
            .insert(number, msg.to_string());
    }

    /// Make `merge_pr` for `number` report `merged: false`
    pub fn refuse_merge(&self, number: u64, msg: &str) {
        self.state
            .lock()
            .unwrap()
            .refuse_merge
            .insert(number, msg.to_string());
    }

    // === Inspection ===

    /// Current state of PR `number`
    pub fn pr(&self, number: u64) -> PullRequest {
        self.state.lock().unwrap().prs[&number].clone()
    }

    /// Current head of branch `name`
    pub fn branch_sha(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().branches.get(name).cloned()
    }

    // === Call verification methods ===

    /// Get all `get_commit` calls
    pub fn get_commit_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().get_commit_calls.clone()
    }

    /// Number of status polls for `git_ref`
    pub fn status_poll_count(&self, git_ref: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .status_calls
            .iter()
            .filter(|r| *r == git_ref)
            .count()
    }

    /// Get all `create_pull_request` calls
    pub fn get_create_pr_calls(&self) -> Vec<NewPullRequest> {
        self.state.lock().unwrap().create_pr_calls.clone()
    }

    /// Get all `update_pr_base` calls
    pub fn get_update_base_calls(&self) -> Vec<UpdateBaseCall> {
        self.state.lock().unwrap().update_base_calls.clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.state.lock().unwrap().merge_pr_calls.clone()
    }

    /// PR numbers passed to `merge_pr`, in order
    pub fn merged_numbers(&self) -> Vec<u64> {
        self.get_merge_pr_calls()
            .iter()
            .map(|c| c.pr_number)
            .collect()
    }

    /// Assert that `update_pr_base` was called with specific args
    pub fn assert_update_base_called(&self, pr_number: u64, new_base: &str) {
        let calls = self.get_update_base_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.pr_number == pr_number && c.new_base == new_base),
            "Expected update_pr_base({pr_number}, {new_base}) but got: {calls:?}"
        );
    }

    /// Assert that nothing was created, retargeted or merged
    pub fn assert_no_mutations(&self) {
        let state = self.state.lock().unwrap();
        assert!(
            state.create_pr_calls.is_empty(),
            "unexpected creates: {:?}",
            state.create_pr_calls
        );
        assert!(
            state.update_base_calls.is_empty(),
            "unexpected retargets: {:?}",
            state.update_base_calls
        );
        assert!(
            state.merge_pr_calls.is_empty(),
            "unexpected merges: {:?}",
            state.merge_pr_calls
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_branches(&self) -> Result<Vec<Branch>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .branches
            .iter()
            .map(|(name, sha)| Branch {
                name: name.clone(),
                sha: sha.clone(),
            })
            .collect())
    }

    async fn get_branch(&self, name: &str) -> Result<Branch> {
        let state = self.state.lock().unwrap();
        state
            .branches
            .get(name)
            .map(|sha| Branch {
                name: name.to_string(),
                sha: sha.clone(),
            })
            .ok_or_else(|| Error::BranchNotFound(name.to_string()))
    }

    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let state = self.state.lock().unwrap();
        // Like the list endpoint, mergeability is not populated.
        Ok(state
            .prs
            .values()
            .filter(|pr| pr.state == PrState::Open)
            .map(|pr| PullRequest {
                mergeable: None,
                ..pr.clone()
            })
            .collect())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let state = self.state.lock().unwrap();
        state
            .prs
            .get(&number)
            .cloned()
            .ok_or(Error::PullRequestNotFound(number))
    }

    async fn get_commit(&self, sha: &str) -> Result<Commit> {
        let mut state = self.state.lock().unwrap();
        state.get_commit_calls.push(sha.to_string());
        if let Some(msg) = &state.error_on_commit {
            return Err(Error::GitHubApi(msg.clone()));
        }
        state
            .commits
            .get(sha)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("No commit found for SHA: {sha}")))
    }

    async fn combined_status(&self, git_ref: &str) -> Result<CombinedStatus> {
        let mut state = self.state.lock().unwrap();
        state.status_calls.push(git_ref.to_string());
        let ci = match state.statuses.get_mut(git_ref) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(CiState::Success),
            Some(queue) => queue.front().copied().unwrap_or(CiState::Success),
            None => CiState::Success,
        };
        Ok(CombinedStatus {
            state: ci,
            total_count: 1,
        })
    }

    async fn create_pull_request(&self, pr: &NewPullRequest) -> Result<PullRequest> {
        let mut state = self.state.lock().unwrap();
        state.create_pr_calls.push(pr.clone());

        let head_sha = state
            .branches
            .get(&pr.head)
            .cloned()
            .ok_or_else(|| Error::BranchNotFound(pr.head.clone()))?;
        let base_sha = state
            .branches
            .get(&pr.base)
            .cloned()
            .ok_or_else(|| Error::BranchNotFound(pr.base.clone()))?;

        let number = state.next_pr_number;
        state.next_pr_number += 1;

        let created = PullRequest {
            number,
            html_url: format!("https://github.com/test/repo/pull/{number}"),
            title: pr.title.clone(),
            body: Some(pr.body.clone()),
            head: PrRef {
                name: pr.head.clone(),
                sha: head_sha,
            },
            base: PrRef {
                name: pr.base.clone(),
                sha: base_sha,
            },
            mergeable: Some(true),
            merged: false,
            state: PrState::Open,
            is_draft: pr.draft,
            author: self.author.clone(),
        };
        state.prs.insert(number, created.clone());
        Ok(created)
    }

    async fn update_pr_base(&self, number: u64, new_base: &str) -> Result<PullRequest> {
        let mut state = self.state.lock().unwrap();
        state.update_base_calls.push(UpdateBaseCall {
            pr_number: number,
            new_base: new_base.to_string(),
        });

        let base_sha = state
            .branches
            .get(new_base)
            .cloned()
            .ok_or_else(|| Error::BranchNotFound(new_base.to_string()))?;
        let pr = state
            .prs
            .get_mut(&number)
            .ok_or(Error::PullRequestNotFound(number))?;
        pr.base = PrRef {
            name: new_base.to_string(),
            sha: base_sha,
        };
        Ok(pr.clone())
    }

    async fn merge_pr(
        &self,
        number: u64,
        head_sha: &str,
        method: MergeMethod,
        message: &str,
    ) -> Result<MergeResult> {
        let mut state = self.state.lock().unwrap();
        state.merge_pr_calls.push(MergePrCall {
            pr_number: number,
            head_sha: head_sha.to_string(),
            method,
            message: message.to_string(),
        });

        if let Some(msg) = state.error_on_merge.get(&number) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        if let Some(msg) = state.refuse_merge.get(&number) {
            return Ok(MergeResult {
                merged: false,
                sha: None,
                message: Some(msg.clone()),
            });
        }

        let pr = state
            .prs
            .get_mut(&number)
            .ok_or(Error::PullRequestNotFound(number))?;
        if pr.head.sha != head_sha {
            return Err(Error::GitHubApi("Head branch was modified".to_string()));
        }
        pr.merged = true;
        pr.state = PrState::Merged;
        let base = pr.base.name.clone();
        let head = pr.head.sha.clone();
        state.branches.insert(base, head.clone());

        Ok(MergeResult {
            merged: true,
            sha: Some(head),
            message: None,
        })
    }
}
