//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by every subcommand: configuration,
//! repository coordinates, token and platform client.

use clap::Args;
use prchain::auth::get_github_auth;
use prchain::config::{Config, default_config_path, load_config};
use prchain::error::{Error, Result};
use prchain::merge::{DEFAULT_POLL_INTERVAL, PollPolicy};
use prchain::platform::{GitHubService, PlatformService, resolve_endpoints};
use prchain::types::{MergeMethod, PlatformConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Flags accepted by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Owner (user or org) of the repository
    #[arg(long, global = true)]
    pub source_owner: Option<String>,

    /// Name of the repository
    #[arg(long, global = true)]
    pub source_repo: Option<String>,

    /// Login of the user whose pull requests are processed
    #[arg(long, global = true)]
    pub login: Option<String>,

    /// GitHub token (defaults to GITHUB_TOKEN, then `gh auth token`)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// GitHub Enterprise API URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// GitHub Enterprise upload URL (requires --api-url)
    #[arg(long, global = true)]
    pub upload_url: Option<String>,

    /// Configuration file (defaults to <config dir>/prchain/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Status polling flags for `submit` and `land`
#[derive(Args, Debug, Clone, Default)]
pub struct PollArgs {
    /// Seconds to wait between polls of a pending CI status
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Give up on a pending status after this many polls
    #[arg(long, value_name = "N")]
    pub max_polls: Option<u32>,

    /// Give up on a pending status after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Shared context for CLI commands that interact with the platform
pub struct CommandContext {
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// Settings from the configuration file
    pub config: Config,
    /// Login from flag or config
    login: Option<String>,
}

/// Flag value, else config value, else a usage error naming the flag
fn required(flag: Option<&String>, config: Option<&String>, name: &str) -> Result<String> {
    flag.or(config)
        .cloned()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "a non-empty value must be specified for --{name} (or `{}` in the config file)",
                name.replace('-', "_")
            ))
        })
}

impl CommandContext {
    /// Create a new command context
    ///
    /// This performs the common setup shared by all commands:
    /// - Load the configuration file
    /// - Resolve owner, repo and endpoints (flag > config)
    /// - Resolve the token
    /// - Create the GitHub service
    pub async fn new(args: &GlobalArgs) -> Result<Self> {
        let config = match args.config.clone().or_else(default_config_path) {
            Some(path) => load_config(&path)?,
            None => Config::default(),
        };
        debug!(?config, "loaded config");

        let owner = required(args.source_owner.as_ref(), config.owner.as_ref(), "source-owner")?;
        let repo = required(args.source_repo.as_ref(), config.repo.as_ref(), "source-repo")?;
        let (api_url, upload_url) = resolve_endpoints(
            args.api_url.as_deref().or(config.api_url.as_deref()),
            args.upload_url.as_deref().or(config.upload_url.as_deref()),
        )?;

        let auth = get_github_auth(args.token.as_deref()).await?;
        let platform = GitHubService::new(
            &auth.token,
            PlatformConfig {
                owner,
                repo,
                api_url,
                upload_url,
            },
        )?;

        let login = args.login.clone().or_else(|| config.login.clone());

        Ok(Self {
            platform: Box::new(platform),
            config,
            login,
        })
    }

    /// Login whose PRs are processed; required by `land` and `chains`
    pub fn login(&self) -> Result<&str> {
        self.login
            .as_deref()
            .filter(|login| !login.is_empty())
            .ok_or_else(|| {
                Error::InvalidArgument(
                    "a non-empty value must be specified for --login (or `login` in the config file)"
                        .to_string(),
                )
            })
    }

    /// Trunk branch (flag > config > `master`)
    pub fn base_branch(&self, flag: Option<&str>) -> String {
        flag.unwrap_or_else(|| self.config.base_branch()).to_string()
    }

    /// Merge method (flag > config > squash)
    pub fn merge_method(&self, flag: Option<MergeMethod>) -> MergeMethod {
        flag.unwrap_or_else(|| self.config.merge_method())
    }

    /// Poll policy (flags > config > wait forever, once a minute)
    pub fn poll_policy(&self, args: &PollArgs) -> PollPolicy {
        PollPolicy {
            interval: args
                .poll_interval
                .map(Duration::from_secs)
                .or_else(|| self.config.poll_interval())
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            max_attempts: args.max_polls.or(self.config.poll_max_attempts),
            timeout: args
                .timeout
                .map(Duration::from_secs)
                .or_else(|| self.config.poll_timeout()),
        }
    }
}
