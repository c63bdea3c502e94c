//! Merge execution - effectful operations
//!
//! Lands a chain root to tip, one PR at a time. Every entry is re-fetched
//! right before it is evaluated since earlier merges and retargets change
//! its base.

use crate::cascade::retarget_dependents;
use crate::error::{Error, Result, ResultExt};
use crate::graph::{Chain, RepoIndex, build_chains, chain_from};
use crate::merge::message::merge_message;
use crate::merge::plan::{MergeStep, Readiness, check_readiness};
use crate::merge::poll::{PollPolicy, wait_for_status};
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use crate::types::{MergeMethod, PullRequest};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::{debug, info, warn};

/// Options for landing chains
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Trunk branch every chain lands on
    pub base_branch: String,
    /// Merge method passed to the host
    pub method: MergeMethod,
    /// Downgrade failing status and stale base to warnings
    pub force: bool,
    /// Report merges and retargets without performing them
    pub dry_run: bool,
    /// How long to wait for pending CI
    pub poll: PollPolicy,
}

/// Result of landing one chain
#[derive(Debug, Clone, Default)]
pub struct LandingResult {
    /// Steps in the order they happened
    pub steps: Vec<MergeStep>,
    /// PRs merged by this run
    pub merged: Vec<u64>,
    /// PR where processing stopped early (blocked, or end of a dry run)
    pub halted_at: Option<u64>,
}

impl LandingResult {
    /// Check if at least one PR was merged
    #[must_use]
    pub fn has_merges(&self) -> bool {
        !self.merged.is_empty()
    }

    /// Check if every entry was processed
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.halted_at.is_none()
    }
}

/// Resolve chain heads to PR numbers
fn chain_numbers<S: BuildHasher>(chain: &Chain, prs: &HashMap<String, PullRequest, S>) -> Vec<u64> {
    chain
        .iter()
        .filter_map(|sha| {
            let number = prs.get(sha).map(|pr| pr.number);
            if number.is_none() {
                warn!(sha, "no PR for chain head");
            }
            number
        })
        .collect()
}

/// Merge one PR, guarded by its head SHA
async fn merge_one(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    message: &str,
    method: MergeMethod,
) -> Result<()> {
    let result = platform
        .merge_pr(pr.number, &pr.head.sha, method, message)
        .await
        .map_err(|e| Error::MergeFailed {
            number: pr.number,
            message: e.to_string(),
        })?;

    if !result.merged {
        return Err(Error::MergeFailed {
            number: pr.number,
            message: result
                .message
                .unwrap_or_else(|| "merge was not performed".to_string()),
        });
    }
    info!(number = pr.number, sha = ?result.sha, "merged");
    Ok(())
}

/// Land the PRs `numbers` (root to tip) onto `options.base_branch`.
///
/// For each entry: skip if already merged, wait for CI, check readiness,
/// merge, then retarget later entries that were based on the merged branch.
/// Stops at the first blocked entry. Errors abort the whole run; entries
/// merged before the error stay merged.
pub async fn land_chain(
    platform: &dyn PlatformService,
    numbers: &[u64],
    options: &MergeOptions,
    progress: &dyn ProgressCallback,
) -> Result<LandingResult> {
    debug!(?numbers, "landing chain");
    let mut result = LandingResult::default();

    for (position, &number) in numbers.iter().enumerate() {
        let pr = platform
            .get_pull_request(number)
            .await
            .with_context(|| format!("failed to get PR #{number}"))?;

        if pr.merged {
            warn!(number, "PR is already merged");
            progress
                .on_message(&format!("PR #{number} is already merged"))
                .await;
            result.steps.push(MergeStep::AlreadyMerged { number });
        } else {
            let state = wait_for_status(
                platform,
                number,
                &pr.head.name,
                &options.poll,
                options.force,
                progress,
            )
            .await?;

            let base = platform
                .get_branch(&options.base_branch)
                .await
                .with_context(|| format!("failed to get base branch {:?}", options.base_branch))?;

            let warnings = match check_readiness(&pr, state, &base, options.force)? {
                Readiness::Ready { warnings } => warnings,
                Readiness::Blocked { reasons } => {
                    let step = MergeStep::Skip { number, reasons };
                    progress.on_message(&step.to_string()).await;
                    result.steps.push(step);
                    result.halted_at = Some(number);
                    break;
                }
            };

            let message = merge_message(platform, &pr).await?;
            let step = MergeStep::Merge {
                number,
                title: pr.title.clone(),
                method: options.method,
                warnings,
            };

            if options.dry_run {
                warn!(number, "skipping merge because a dry run was requested");
                progress.on_message(&format!("Would {step}")).await;
            } else {
                progress.on_message(&format!("Merging PR #{number}: {}", pr.title)).await;
                merge_one(platform, &pr, &message, options.method).await?;
                progress.on_message(&format!("Merged PR #{number}")).await;
                result.merged.push(number);
            }
            result.steps.push(step);
        }

        let mut later = Vec::new();
        for &next in &numbers[position + 1..] {
            later.push(
                platform
                    .get_pull_request(next)
                    .await
                    .with_context(|| format!("failed to get PR #{next}"))?,
            );
        }
        let retargets =
            retarget_dependents(platform, &pr, &later, options.dry_run, progress).await?;
        result
            .steps
            .extend(retargets.into_iter().map(MergeStep::RetargetBase));

        if options.dry_run && !pr.merged {
            // Later entries depend on the merge that was not performed.
            result.halted_at = Some(number);
            break;
        }
    }

    Ok(result)
}

/// Land PR `number` and every open PR stacked on top of it.
pub async fn land_from_pr(
    platform: &dyn PlatformService,
    number: u64,
    options: &MergeOptions,
    progress: &dyn ProgressCallback,
) -> Result<LandingResult> {
    let start = platform
        .get_pull_request(number)
        .await
        .with_context(|| format!("failed to get PR #{number}"))?;

    let mut prs: HashMap<String, PullRequest> = platform
        .list_pull_requests()
        .await
        .context("failed to list pull requests")?
        .into_iter()
        .map(|pr| (pr.head.sha.clone(), pr))
        .collect();
    prs.insert(start.head.sha.clone(), start.clone());

    let chain = chain_from(&prs, &start.head.sha, &options.base_branch)?;
    land_chain(platform, &chain_numbers(&chain, &prs), options, progress).await
}

/// Land every chain of open PRs authored by `login`.
///
/// Chains are processed in root PR number order. The first error stops the
/// whole run.
pub async fn land_chains(
    platform: &dyn PlatformService,
    index: &RepoIndex,
    login: &str,
    options: &MergeOptions,
    progress: &dyn ProgressCallback,
) -> Result<Vec<LandingResult>> {
    let prs = index.prs_by_head(Some(login));
    let chains = build_chains(&prs, &options.base_branch)?;
    info!(login, count = chains.len(), "landing chains");

    let mut results = Vec::with_capacity(chains.len());
    for chain in &chains {
        let numbers = chain_numbers(chain, &prs);
        let landed = land_chain(platform, &numbers, options, progress)
            .await
            .with_context(|| format!("process chain {numbers:?} failed"))?;
        results.push(landed);
    }
    Ok(results)
}
