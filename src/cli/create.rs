//! Create command - open draft PRs for every branch in a stack

use crate::cli::CliProgress;
use crate::cli::context::{CommandContext, GlobalArgs};
use crate::cli::style::{Stylize, check, pr_link};
use anstream::println;
use prchain::error::Result;
use prchain::graph::RepoIndex;
use prchain::submit::{CreateOptions, create_chain};

/// Options for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateCommandOptions {
    /// Branch at the top of the stack
    pub branch: String,
    /// Trunk branch (flag value, if given)
    pub base: Option<String>,
    /// Creation cap (flag value, if given)
    pub max_creates: Option<usize>,
    /// Also create a PR for `branch` itself
    pub include_branch: bool,
    /// Log what would be created without creating anything
    pub dry_run: bool,
}

/// Run the create command
pub async fn run_create(global: &GlobalArgs, options: CreateCommandOptions) -> Result<()> {
    let ctx = CommandContext::new(global).await?;
    let platform = ctx.platform.as_ref();

    println!("{}", "Loading branches and pull requests...".muted());
    let index = RepoIndex::load(platform).await?;

    let create_options = CreateOptions {
        tip_branch: options.branch,
        base_branch: ctx.base_branch(options.base.as_deref()),
        max_creates: options.max_creates.unwrap_or_else(|| ctx.config.max_creates()),
        include_tip: options.include_branch,
        dry_run: options.dry_run,
    };

    let progress = CliProgress::new();
    let result = create_chain(platform, &index, &create_options, &progress).await?;

    if options.dry_run {
        println!(
            "{}",
            format!("{} pull request(s) would be created", result.skipped.len()).muted()
        );
        return Ok(());
    }

    if result.created.is_empty() {
        println!("{}", "No pull requests needed".muted());
        return Ok(());
    }

    for pr in &result.created {
        println!(
            "{} {} {} → {}",
            check(),
            pr_link(pr.number, &pr.html_url),
            pr.head.name.accent(),
            pr.base.name
        );
    }
    Ok(())
}
