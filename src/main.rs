//! prchain - stacked pull requests on GitHub
//!
//! CLI binary for creating and landing chains of dependent pull requests.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "prchain")]
#[command(about = "Create and land chains of stacked GitHub pull requests")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: cli::GlobalArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create draft PRs for every branch between the base and a tip branch
    Create {
        /// Tip branch of the stack
        #[arg(long)]
        branch: String,

        /// Base branch of the stack [default: master]
        #[arg(long)]
        base: Option<String>,

        /// Maximum number of pull requests to create [default: 10]
        #[arg(long)]
        max_creates: Option<usize>,

        /// Also create a PR for --branch itself
        #[arg(long)]
        include_branch: bool,

        /// Dry run - log the pull requests that would be created
        #[arg(long)]
        dry_run: bool,
    },

    /// Merge a PR and every open PR stacked on it
    Submit {
        /// Number of the pull request to submit
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        pr: u64,

        /// Base branch the PR must target [default: master]
        #[arg(long)]
        base: Option<String>,

        /// Merge method [default: squash]
        #[arg(long, value_enum)]
        method: Option<cli::MethodArg>,

        /// Merge even if CI is failing or pending, or the base is stale
        #[arg(long)]
        force: bool,

        /// Dry run - report what would be merged without merging
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        poll: cli::PollArgs,
    },

    /// Merge every chain of open PRs authored by --login
    Land {
        /// Branch the chains are based on [default: master]
        #[arg(long)]
        base: Option<String>,

        /// Merge method [default: squash]
        #[arg(long, value_enum)]
        method: Option<cli::MethodArg>,

        /// Merge even if CI is failing or pending, or the base is stale
        #[arg(long)]
        force: bool,

        /// Dry run - report what would be merged without merging
        #[arg(long)]
        dry_run: bool,

        /// Show the chains and prompt for confirmation before merging
        #[arg(long, short = 'c')]
        confirm: bool,

        #[command(flatten)]
        poll: cli::PollArgs,
    },

    /// Retarget open PRs based on a merged PR's branch onto its base
    Rebase {
        /// Number of the merged pull request
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        pr: u64,

        /// Dry run - report matching PRs without changing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the chains formed by --login's open PRs
    Chains {
        /// Branch the chains are based on [default: master]
        #[arg(long)]
        base: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "prchain=warn",
        1 => "prchain=debug",
        _ => "prchain=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Create {
            branch,
            base,
            max_creates,
            include_branch,
            dry_run,
        } => {
            cli::run_create(
                &cli.global,
                cli::CreateCommandOptions {
                    branch,
                    base,
                    max_creates,
                    include_branch,
                    dry_run,
                },
            )
            .await?;
        }
        Commands::Submit {
            pr,
            base,
            method,
            force,
            dry_run,
            poll,
        } => {
            cli::run_submit(
                &cli.global,
                pr,
                cli::LandCommandOptions {
                    base,
                    method: method.map(Into::into),
                    force,
                    dry_run,
                    confirm: false,
                    poll,
                },
            )
            .await?;
        }
        Commands::Land {
            base,
            method,
            force,
            dry_run,
            confirm,
            poll,
        } => {
            cli::run_land(
                &cli.global,
                cli::LandCommandOptions {
                    base,
                    method: method.map(Into::into),
                    force,
                    dry_run,
                    confirm,
                    poll,
                },
            )
            .await?;
        }
        Commands::Rebase { pr, dry_run } => {
            cli::run_rebase(&cli.global, pr, dry_run).await?;
        }
        Commands::Chains { base } => {
            cli::run_chains(&cli.global, base.as_deref()).await?;
        }
    }

    Ok(())
}
