//! Authentication for GitHub
//!
//! Tokens come from the `--token` flag, the `GITHUB_TOKEN` environment
//! variable or the GitHub CLI (`gh auth token`), in that order.

use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variable checked for a token
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed on the command line
    Flag,
    /// Token from environment variable
    EnvVar,
    /// Token from CLI tool (gh)
    Cli,
}

/// A resolved GitHub token
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// The token itself
    pub token: String,
    /// Where it came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pick a token from the flag or environment value, ignoring empty strings.
pub fn resolve_static_token(flag: Option<&str>, env: Option<&str>) -> Option<GitHubAuthConfig> {
    non_empty(flag)
        .map(|token| (token, AuthSource::Flag))
        .or_else(|| non_empty(env).map(|token| (token, AuthSource::EnvVar)))
        .map(|(token, source)| GitHubAuthConfig {
            token: token.to_string(),
            source,
        })
}

/// Ask the GitHub CLI for its token. `None` if gh is missing or logged out.
async fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        debug!(status = %output.status, "gh auth token failed");
        return None;
    }
    let token = String::from_utf8(output.stdout).ok()?;
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Resolve a GitHub token.
///
/// `flag` is the `--token` value, if any.
pub async fn get_github_auth(flag: Option<&str>) -> Result<GitHubAuthConfig> {
    let env = std::env::var(TOKEN_ENV_VAR).ok();
    if let Some(auth) = resolve_static_token(flag, env.as_deref()) {
        debug!(source = ?auth.source, "using token");
        return Ok(auth);
    }

    if let Some(token) = gh_cli_token().await {
        debug!("using token from gh");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(format!(
        "Unauthorized: no token present (use --token, set {TOKEN_ENV_VAR} or run `gh auth login`)"
    )))
}
