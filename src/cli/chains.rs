//! Chains command - show how a login's open PRs stack up

use crate::cli::context::{CommandContext, GlobalArgs};
use crate::cli::style::{self, Stylize, pipe, pr_link};
use anstream::println;
use prchain::error::Result;
use prchain::graph::{RepoIndex, build_chains};

/// Run the chains command
pub async fn run_chains(global: &GlobalArgs, base: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(global).await?;
    let login = ctx.login()?;
    let trunk = ctx.base_branch(base);

    let index = RepoIndex::load(ctx.platform.as_ref()).await?;
    let prs = index.prs_by_head(Some(login));
    let chains = build_chains(&prs, &trunk)?;

    if chains.is_empty() {
        println!(
            "{}",
            format!("No open pull requests by {login} are based on {trunk}").muted()
        );
        return Ok(());
    }

    for (i, chain) in chains.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            format!("Chain {}:", i + 1).emphasis(),
            format!("{} PR(s)", chain.len()).muted()
        );
        println!("  {}", trunk.muted());
        for sha in chain.iter() {
            let Some(pr) = prs.get(sha) else { continue };
            println!(
                "  {} {} {} {}",
                style::BULLET,
                pr_link(pr.number, &pr.html_url),
                pr.head.name.accent(),
                pr.title
            );
            println!("  {}   {}", pipe(), sha.muted());
        }
    }
    Ok(())
}
