//! Rebase command - retarget PRs stacked on a merged PR

use crate::cli::CliProgress;
use crate::cli::context::{CommandContext, GlobalArgs};
use crate::cli::style::{Stylize, check};
use anstream::println;
use prchain::cascade::rebase_around;
use prchain::error::Result;

/// Run the rebase command
pub async fn run_rebase(global: &GlobalArgs, number: u64, dry_run: bool) -> Result<()> {
    let ctx = CommandContext::new(global).await?;
    let progress = CliProgress::new();

    let retargets = rebase_around(ctx.platform.as_ref(), number, dry_run, &progress).await?;

    if retargets.is_empty() {
        println!(
            "{}",
            format!("No open pull requests are based on PR #{number}").muted()
        );
        return Ok(());
    }

    let verb = if dry_run { "would move" } else { "moved" };
    for retarget in &retargets {
        println!(
            "{} PR #{} {verb} {} → {}",
            check(),
            retarget.number.accent(),
            retarget.from.muted(),
            retarget.to.accent()
        );
    }
    Ok(())
}
