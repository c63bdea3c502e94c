//! Land command - merge every chain of a login's open PRs

use crate::cli::CliProgress;
use crate::cli::context::{CommandContext, GlobalArgs, PollArgs};
use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::Confirm;
use prchain::error::{Error, Result};
use prchain::graph::{RepoIndex, build_chains};
use prchain::merge::{LandingResult, MergeOptions, MergeStep, land_chains};
use prchain::types::MergeMethod;

/// Options shared by the land and submit commands
#[derive(Debug, Clone, Default)]
pub struct LandCommandOptions {
    /// Trunk branch (flag value, if given)
    pub base: Option<String>,
    /// Merge method (flag value, if given)
    pub method: Option<MergeMethod>,
    /// Override failing status and stale base checks
    pub force: bool,
    /// Report what would happen without merging
    pub dry_run: bool,
    /// Show the chains and ask before merging
    pub confirm: bool,
    /// Status polling flags
    pub poll: PollArgs,
}

impl LandCommandOptions {
    /// Resolve flags against the context's config
    pub(crate) fn merge_options(&self, ctx: &CommandContext) -> MergeOptions {
        MergeOptions {
            base_branch: ctx.base_branch(self.base.as_deref()),
            method: ctx.merge_method(self.method),
            force: self.force,
            dry_run: self.dry_run,
            poll: ctx.poll_policy(&self.poll),
        }
    }
}

/// Print what happened to one chain
pub(crate) fn print_landing(result: &LandingResult, dry_run: bool) {
    for step in &result.steps {
        match step {
            MergeStep::Skip { .. } => println!("  {} {}", "✗".error(), step.to_string().warn()),
            MergeStep::Merge { .. } | MergeStep::RetargetBase(_) if dry_run => {
                println!("  {} would {}", "~".muted(), step.to_string().muted());
            }
            _ => println!("  {} {step}", check()),
        }
    }

    if let Some(number) = result.halted_at {
        println!(
            "  {}",
            format!("stopped at PR #{number}; later PRs were left for the next run").muted()
        );
    }
}

/// Run the land command
pub async fn run_land(global: &GlobalArgs, options: LandCommandOptions) -> Result<()> {
    let ctx = CommandContext::new(global).await?;
    let login = ctx.login()?;
    let merge_options = options.merge_options(&ctx);
    let platform = ctx.platform.as_ref();

    println!("{}", "Loading branches and pull requests...".muted());
    let index = RepoIndex::load(platform).await?;

    if options.confirm && !options.dry_run {
        let prs = index.prs_by_head(Some(login));
        let chains = build_chains(&prs, &merge_options.base_branch)?;
        if chains.is_empty() {
            println!("{}", "Nothing to land".muted());
            return Ok(());
        }
        for chain in &chains {
            let numbers: Vec<String> = chain
                .iter()
                .filter_map(|sha| prs.get(sha))
                .map(|pr| format!("#{}", pr.number))
                .collect();
            println!("  {}", numbers.join(" → ").accent());
        }
        if !Confirm::new()
            .with_prompt(format!(
                "Land {} chain(s) onto {} with {}?",
                chains.len(),
                merge_options.base_branch,
                merge_options.method
            ))
            .default(false)
            .interact()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
    }

    let progress = CliProgress::new();
    let results = land_chains(platform, &index, login, &merge_options, &progress).await?;

    if results.is_empty() {
        println!("{}", "Nothing to land".muted());
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}", format!("Chain {}:", i + 1).emphasis());
        print_landing(result, options.dry_run);
    }

    let merged: usize = results.iter().map(|r| r.merged.len()).sum();
    println!("{}", format!("{merged} pull request(s) merged").muted());
    Ok(())
}
