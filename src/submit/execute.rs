//! Phase 3: Creation execution
//!
//! Resolves the branch range, plans the spans and creates the missing draft
//! PRs in dependency order.

use crate::error::{Error, Result, ResultExt};
use crate::graph::{MAX_CHAIN_LENGTH, RepoIndex, walk_commit_chain};
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use crate::submit::plan::{CreatePlan, CreateStep, PrToCreate, plan_creation};
use crate::types::{NewPullRequest, PullRequest};
use tracing::{debug, info};

/// Options for a `create` run
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Branch at the top of the stack
    pub tip_branch: String,
    /// Trunk branch the stack is based on
    pub base_branch: String,
    /// Maximum number of PRs to create in one run
    pub max_creates: usize,
    /// Also create a PR for the tip branch
    pub include_tip: bool,
    /// Log intended creations without calling the platform
    pub dry_run: bool,
}

/// Result of a `create` run
#[derive(Debug, Clone, Default)]
pub struct CreateResult {
    /// The plan that was executed
    pub plan: CreatePlan,
    /// PRs created (empty in dry-run mode)
    pub created: Vec<PullRequest>,
    /// Creations that were only reported (dry-run mode)
    pub skipped: Vec<NewPullRequest>,
}

/// Build the draft PR request for one span.
///
/// Title is the first line of the span's oldest commit, body the rest of its
/// message. A commit without a body cannot describe a PR.
pub fn new_pull_request(create: &PrToCreate) -> Result<NewPullRequest> {
    let (title, body) =
        create
            .oldest
            .title_and_body()
            .ok_or_else(|| Error::MalformedCommitMessage {
                sha: create.oldest.sha.clone(),
            })?;

    Ok(NewPullRequest {
        title: title.to_string(),
        head: create.branch.clone(),
        base: create.base.clone(),
        body: body.to_string(),
        draft: true,
    })
}

/// Create any missing PRs for the branches between `base_branch` and
/// `tip_branch`.
///
/// Creations happen one at a time, so a failure (including hitting
/// `max_creates`) leaves the earlier PRs in place. Dry runs count toward
/// the limit as well.
pub async fn create_chain(
    platform: &dyn PlatformService,
    index: &RepoIndex,
    options: &CreateOptions,
    progress: &dyn ProgressCallback,
) -> Result<CreateResult> {
    let tip = platform
        .get_branch(&options.tip_branch)
        .await
        .with_context(|| format!("failed to get tip branch {:?}", options.tip_branch))?;
    let base = platform
        .get_branch(&options.base_branch)
        .await
        .with_context(|| format!("failed to get base branch {:?}", options.base_branch))?;
    debug!(tip = %tip.sha, base = %base.sha, "resolved branch range");

    let commits = walk_commit_chain(platform, &tip.sha, &base.sha, MAX_CHAIN_LENGTH)
        .await
        .context("get commit chain failed")?;

    let plan = plan_creation(
        &commits,
        &tip.sha,
        index,
        &options.base_branch,
        options.include_tip,
    )?;

    if options.dry_run {
        progress
            .on_message("Dry run - no pull requests will be created")
            .await;
    }

    let mut result = CreateResult {
        plan: plan.clone(),
        ..Default::default()
    };
    let mut count = 0;

    for step in &plan.steps {
        let create = match step {
            CreateStep::Existing { branch, number } => {
                progress
                    .on_message(&format!("Branch {branch} already has PR #{number}"))
                    .await;
                continue;
            }
            CreateStep::Create(create) => create,
        };

        if count >= options.max_creates {
            return Err(Error::CreateLimitExceeded {
                limit: options.max_creates,
                branch: create.branch.clone(),
            });
        }

        let request = new_pull_request(create)?;

        if options.dry_run {
            info!(
                branch = %create.branch,
                base = %create.base,
                oldest = %create.oldest.sha,
                newest = %create.newest,
                "dry run, skipping PR creation"
            );
            progress.on_message(&format!("Would {step}")).await;
            result.skipped.push(request);
        } else {
            let pr = platform
                .create_pull_request(&request)
                .await
                .with_context(|| format!("failed to create PR for {}", create.branch))?;
            info!(number = pr.number, branch = %create.branch, "created PR");
            progress
                .on_message(&format!(
                    "Created PR #{} for {} → {}",
                    pr.number, create.branch, create.base
                ))
                .await;
            result.created.push(pr);
        }
        count += 1;
    }

    Ok(result)
}
