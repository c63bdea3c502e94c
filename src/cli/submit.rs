//! Submit command - merge one PR and everything stacked on it

use crate::cli::CliProgress;
use crate::cli::context::{CommandContext, GlobalArgs};
use crate::cli::land::{LandCommandOptions, print_landing};
use crate::cli::style::Stylize;
use anstream::println;
use prchain::error::Result;
use prchain::merge::land_from_pr;

/// Run the submit command
pub async fn run_submit(
    global: &GlobalArgs,
    number: u64,
    options: LandCommandOptions,
) -> Result<()> {
    let ctx = CommandContext::new(global).await?;
    let merge_options = options.merge_options(&ctx);

    let progress = CliProgress::new();
    let result = land_from_pr(ctx.platform.as_ref(), number, &merge_options, &progress).await?;

    println!(
        "{}",
        format!("PR #{number} onto {}:", merge_options.base_branch).emphasis()
    );
    print_landing(&result, options.dry_run);
    Ok(())
}
