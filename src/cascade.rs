//! Base retargeting after a merge
//!
//! Once a PR is merged its head branch stops being an integration point.
//! Every open PR based on that branch is moved onto the branch it was merged
//! into.

use crate::error::{Error, Result, ResultExt};
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use crate::types::PullRequest;
use tracing::{debug, info};

/// One base change, performed or (in dry-run mode) only reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retarget {
    /// PR whose base changes
    pub number: u64,
    /// Old base branch (the merged PR's head)
    pub from: String,
    /// New base branch (the merged PR's base)
    pub to: String,
}

impl std::fmt::Display for Retarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "retarget PR #{} {} → {}", self.number, self.from, self.to)
    }
}

/// Retarget every PR in `candidates` that is based on `merged`'s head branch.
///
/// Returns the base changes in candidate order.
pub async fn retarget_dependents(
    platform: &dyn PlatformService,
    merged: &PullRequest,
    candidates: &[PullRequest],
    dry_run: bool,
    progress: &dyn ProgressCallback,
) -> Result<Vec<Retarget>> {
    let from = &merged.head.name;
    let to = &merged.base.name;
    let mut retargets = Vec::new();

    for pr in candidates.iter().filter(|pr| pr.base.name == *from) {
        let retarget = Retarget {
            number: pr.number,
            from: from.clone(),
            to: to.clone(),
        };

        if dry_run {
            info!(number = pr.number, %from, %to, "dry run, not changing base");
            progress.on_message(&format!("Would {retarget}")).await;
        } else {
            info!(number = pr.number, %from, %to, "changing base");
            platform
                .update_pr_base(pr.number, to)
                .await
                .with_context(|| format!("failed to change base of PR #{}", pr.number))?;
            progress.on_message(&format!("Retargeted PR #{} onto {to}", pr.number)).await;
        }
        retargets.push(retarget);
    }

    debug!(merged = merged.number, count = retargets.len(), "retarget done");
    Ok(retargets)
}

/// Move every open PR stacked on merged PR `number` onto its base branch.
///
/// Fails with `NotMerged` if the PR is still open (or was closed unmerged).
pub async fn rebase_around(
    platform: &dyn PlatformService,
    number: u64,
    dry_run: bool,
    progress: &dyn ProgressCallback,
) -> Result<Vec<Retarget>> {
    let merged = platform
        .get_pull_request(number)
        .await
        .with_context(|| format!("PR #{number} could not be read"))?;
    if !merged.merged {
        return Err(Error::NotMerged(number));
    }

    let open = platform
        .list_pull_requests()
        .await
        .context("unable to get pull requests")?;

    retarget_dependents(platform, &merged, &open, dry_run, progress).await
}
