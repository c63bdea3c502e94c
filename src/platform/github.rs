//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    Branch, CiState, CombinedStatus, Commit, MergeMethod, MergeResult, NewPullRequest,
    PlatformConfig, PrRef, PrState, PullRequest,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Page size for list endpoints
const PER_PAGE: usize = 100;

// Raw REST response types

#[derive(Deserialize)]
struct BranchResponse {
    name: String,
    commit: ShaRef,
}

#[derive(Deserialize)]
struct ShaRef {
    sha: String,
}

#[derive(Deserialize)]
struct GitCommitResponse {
    sha: String,
    message: String,
    parents: Vec<ShaRef>,
}

#[derive(Deserialize)]
struct CombinedStatusResponse {
    state: String,
    total_count: u32,
}

#[derive(Deserialize)]
struct CheckRunsResponse {
    total_count: u32,
    check_runs: Vec<CheckRun>,
}

#[derive(Deserialize)]
struct CheckRun {
    status: String,
    conclusion: Option<String>,
}

/// GitHub service using octocrab for pull requests and raw REST for the rest
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (branches, commits, statuses)
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(config.api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .upload_uri(config.upload_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("prchain")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
        })
    }

    /// Repository this service talks to
    pub const fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn repo_url(&self, path: &str) -> Result<url::Url> {
        let joined = format!("repos/{}/{}/{path}", self.config.owner, self.config.repo);
        Ok(self.config.api_url.join(&joined)?)
    }

    /// GET a repository-relative path.
    ///
    /// Returns `Ok(None)` on 404 so callers can raise their own not-found error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.repo_url(path)?;
        debug!(%url, "GET");

        let response = self
            .http_client
            .get(url.clone())
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("GET {url} failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        let body = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse response from {url}: {e}")))?;
        Ok(Some(body))
    }

    /// Legacy commit status API (external CI services)
    async fn commit_status(&self, git_ref: &str) -> Result<CombinedStatus> {
        let path = format!("commits/{}/status", urlencoding::encode(git_ref));
        let status: CombinedStatusResponse = self
            .get_json(&path)
            .await?
            .ok_or_else(|| Error::GitHubApi(format!("ref '{git_ref}' not found")))?;

        // GitHub reports "pending" when nothing is configured
        if status.total_count == 0 {
            debug!("No commit statuses configured");
            return Ok(CombinedStatus {
                state: CiState::Success,
                total_count: 0,
            });
        }

        debug!(state = %status.state, count = status.total_count, "Commit status result");
        Ok(CombinedStatus {
            state: CiState::from_github(&status.state),
            total_count: status.total_count,
        })
    }

    /// GitHub Actions check runs, folded into the same three states.
    ///
    /// A 404 means Actions is not set up for the repository. Any other
    /// failure is an error.
    async fn check_runs(&self, git_ref: &str) -> Result<CombinedStatus> {
        let path = format!("commits/{}/check-runs", urlencoding::encode(git_ref));
        let Some(runs) = self.get_json::<CheckRunsResponse>(&path).await? else {
            debug!("No check runs endpoint, assuming no checks configured");
            return Ok(CombinedStatus {
                state: CiState::Success,
                total_count: 0,
            });
        };

        Ok(CombinedStatus {
            state: fold_check_runs(&runs.check_runs),
            total_count: runs.total_count,
        })
    }
}

/// Reduce check runs to a single state: any failure wins, then any pending.
fn fold_check_runs(runs: &[CheckRun]) -> CiState {
    let mut state = CiState::Success;
    for run in runs {
        if run.status != "completed" {
            debug!(status = %run.status, "Check run still in progress");
            state = CiState::Pending;
            continue;
        }
        match run.conclusion.as_deref() {
            Some("success" | "neutral" | "skipped") => {}
            Some(conclusion) => {
                debug!(conclusion = %conclusion, "Check run failed");
                return CiState::Failure;
            }
            None => return CiState::Failure,
        }
    }
    state
}

/// Combine legacy statuses and check runs
const fn merge_states(a: CiState, b: CiState) -> CiState {
    match (a, b) {
        (CiState::Failure, _) | (_, CiState::Failure) => CiState::Failure,
        (CiState::Pending, _) | (_, CiState::Pending) => CiState::Pending,
        (CiState::Success, CiState::Success) => CiState::Success,
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    let merged = pr.merged_at.is_some() || pr.merged.unwrap_or(false);
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        _ if merged => PrState::Merged,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        head: PrRef {
            name: pr.head.ref_field.clone(),
            sha: pr.head.sha.clone(),
        },
        base: PrRef {
            name: pr.base.ref_field.clone(),
            sha: pr.base.sha.clone(),
        },
        mergeable: pr.mergeable,
        merged,
        state,
        is_draft: pr.draft.unwrap_or(false),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_branches(&self) -> Result<Vec<Branch>> {
        let mut branches = Vec::new();
        let mut page = 1;
        loop {
            let path = format!("branches?per_page={PER_PAGE}&page={page}");
            let batch: Vec<BranchResponse> = self.get_json(&path).await?.unwrap_or_default();
            let done = batch.len() < PER_PAGE;
            branches.extend(batch.into_iter().map(|b| Branch {
                name: b.name,
                sha: b.commit.sha,
            }));
            if done {
                break;
            }
            page += 1;
        }
        debug!(count = branches.len(), "listed branches");
        Ok(branches)
    }

    async fn get_branch(&self, name: &str) -> Result<Branch> {
        debug!(name, "getting branch");
        let path = format!("branches/{}", urlencoding::encode(name));
        let branch: BranchResponse = self
            .get_json(&path)
            .await?
            .ok_or_else(|| Error::BranchNotFound(name.to_string()))?;
        Ok(Branch {
            name: branch.name,
            sha: branch.commit.sha,
        })
    }

    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>> {
        debug!("listing open PRs");
        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;
        let prs = self.client.all_pages(page).await?;

        let result: Vec<PullRequest> = prs.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed PRs");
        Ok(result)
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        debug!(number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(number)
            .await
            .map_err(|e| match e {
                octocrab::Error::GitHub { ref source, .. }
                    if source.status_code.as_u16() == 404 =>
                {
                    Error::PullRequestNotFound(number)
                }
                other => Error::Octocrab(other),
            })?;

        let result = pr_from_octocrab(&pr);
        debug!(number, state = %result.state, mergeable = ?result.mergeable, "got PR");
        Ok(result)
    }

    async fn get_commit(&self, sha: &str) -> Result<Commit> {
        debug!(sha, "getting commit");
        let path = format!("git/commits/{sha}");
        let commit: GitCommitResponse = self
            .get_json(&path)
            .await?
            .ok_or_else(|| Error::GitHubApi(format!("commit {sha} not found")))?;
        Ok(Commit {
            sha: commit.sha,
            message: commit.message,
            parents: commit.parents.into_iter().map(|p| p.sha).collect(),
        })
    }

    async fn combined_status(&self, git_ref: &str) -> Result<CombinedStatus> {
        let statuses = self.commit_status(git_ref).await?;
        let checks = self.check_runs(git_ref).await?;
        let combined = CombinedStatus {
            state: merge_states(statuses.state, checks.state),
            total_count: statuses.total_count + checks.total_count,
        };
        debug!(git_ref, state = %combined.state, "combined status");
        Ok(combined)
    }

    async fn create_pull_request(&self, pr: &NewPullRequest) -> Result<PullRequest> {
        debug!(head = %pr.head, base = %pr.base, draft = pr.draft, "creating PR");
        let created = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(&pr.title, &pr.head, &pr.base)
            .body(&pr.body)
            .draft(pr.draft)
            .send()
            .await?;

        let result = pr_from_octocrab(&created);
        debug!(number = result.number, "created PR");
        Ok(result)
    }

    async fn update_pr_base(&self, number: u64, new_base: &str) -> Result<PullRequest> {
        debug!(number, new_base, "updating PR base");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .update(number)
            .base(new_base)
            .send()
            .await?;

        debug!(number, "updated PR base");
        Ok(pr_from_octocrab(&pr))
    }

    async fn merge_pr(
        &self,
        number: u64,
        head_sha: &str,
        method: MergeMethod,
        message: &str,
    ) -> Result<MergeResult> {
        debug!(number, %method, head_sha, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(number)
            .method(octocrab_method)
            .sha(head_sha)
            .message(message)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }
}
