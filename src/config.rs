//! Configuration file at `<config_dir>/prchain/config.toml`.
//!
//! Every key is optional and supplies the default for the matching CLI flag.

use crate::error::{Error, Result};
use crate::types::MergeMethod;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform config dir.
const CONFIG_DIR: &str = "prchain";

/// Filename for the configuration file.
const CONFIG_FILE: &str = "config.toml";

/// Trunk branch used when neither flag nor file name one
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// Creation cap used when neither flag nor file set one
pub const DEFAULT_MAX_CREATES: usize = 10;

/// Settings read from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repository owner (user or organization)
    pub owner: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Login whose PRs are landed
    pub login: Option<String>,
    /// REST API URL (GitHub Enterprise)
    pub api_url: Option<String>,
    /// Upload URL (GitHub Enterprise)
    pub upload_url: Option<String>,
    /// Trunk branch
    pub base_branch: Option<String>,
    /// Merge method
    pub merge_method: Option<MergeMethod>,
    /// Maximum PRs created per run
    pub max_creates: Option<usize>,
    /// Seconds between status polls
    pub poll_interval_secs: Option<u64>,
    /// Maximum status polls per PR
    pub poll_max_attempts: Option<u32>,
    /// Maximum seconds to wait on one PR's status
    pub poll_timeout_secs: Option<u64>,
}

impl Config {
    /// Trunk branch, falling back to `master`
    pub fn base_branch(&self) -> &str {
        self.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    }

    /// Merge method, falling back to squash
    pub fn merge_method(&self) -> MergeMethod {
        self.merge_method.unwrap_or_default()
    }

    /// Creation cap, falling back to 10
    pub fn max_creates(&self) -> usize {
        self.max_creates.unwrap_or(DEFAULT_MAX_CREATES)
    }

    /// Poll interval, if configured
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_secs.map(Duration::from_secs)
    }

    /// Poll timeout, if configured
    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }
}

/// Default path of the configuration file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load configuration from `path`.
///
/// Returns an empty `Config` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}
