//! Branch and pull request index
//!
//! One immutable snapshot per run: branches grouped by head SHA and PRs keyed
//! by head SHA and number. Built once and passed to whoever needs it.

use crate::error::{Error, Result, ResultExt};
use crate::platform::PlatformService;
use crate::types::{Branch, PullRequest};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Lookup tables for one run
#[derive(Debug, Clone, Default)]
pub struct RepoIndex {
    branches_by_sha: HashMap<String, BTreeSet<String>>,
    prs_by_sha: HashMap<String, PullRequest>,
    prs_by_number: BTreeMap<u64, PullRequest>,
}

impl RepoIndex {
    /// Load branches and open PRs from the platform.
    ///
    /// Each listed PR is re-fetched by number since list results may be
    /// missing fields such as `mergeable`.
    pub async fn load(platform: &dyn PlatformService) -> Result<Self> {
        let branches = platform
            .list_branches()
            .await
            .context("failed to list branches")?;

        let listed = platform
            .list_pull_requests()
            .await
            .context("failed to list pull requests")?;
        debug!(count = listed.len(), "listed pull requests");

        let mut prs = Vec::with_capacity(listed.len());
        for pr in &listed {
            let full = platform
                .get_pull_request(pr.number)
                .await
                .with_context(|| {
                    format!(
                        "unable to fetch full PR #{} (sha {})",
                        pr.number, pr.head.sha
                    )
                })?;
            prs.push(full);
        }

        Ok(Self::from_parts(branches, prs))
    }

    /// Build an index from already fetched data
    pub fn from_parts(branches: Vec<Branch>, prs: Vec<PullRequest>) -> Self {
        let mut branches_by_sha: HashMap<String, BTreeSet<String>> = HashMap::new();
        for branch in branches {
            debug!(name = %branch.name, sha = %branch.sha, "adding branch");
            branches_by_sha
                .entry(branch.sha)
                .or_default()
                .insert(branch.name);
        }

        let mut prs_by_sha = HashMap::new();
        let mut prs_by_number = BTreeMap::new();
        for pr in prs {
            debug!(number = pr.number, head = %pr.head.sha, "adding PR");
            prs_by_sha.insert(pr.head.sha.clone(), pr.clone());
            prs_by_number.insert(pr.number, pr);
        }

        Self {
            branches_by_sha,
            prs_by_sha,
            prs_by_number,
        }
    }

    /// All branch names whose head is `sha` (sorted)
    pub fn branches_at(&self, sha: &str) -> Option<&BTreeSet<String>> {
        self.branches_by_sha.get(sha)
    }

    /// The PR whose head is `sha`
    pub fn pr_for_sha(&self, sha: &str) -> Option<&PullRequest> {
        self.prs_by_sha.get(sha)
    }

    /// The PR with `number`
    pub fn pr(&self, number: u64) -> Option<&PullRequest> {
        self.prs_by_number.get(&number)
    }

    /// All indexed PRs in number order
    pub fn pull_requests(&self) -> impl Iterator<Item = &PullRequest> {
        self.prs_by_number.values()
    }

    /// PRs keyed by head SHA, optionally restricted to one author
    pub fn prs_by_head(&self, author: Option<&str>) -> HashMap<String, PullRequest> {
        self.prs_by_sha
            .iter()
            .filter(|(_, pr)| author.is_none_or(|login| pr.author == login))
            .map(|(sha, pr)| (sha.clone(), pr.clone()))
            .collect()
    }
}

/// Pick the single branch a commit stands for.
///
/// One candidate is used directly. With two, the one that is not
/// `base_branch` wins: the previous link's tip and this link's root share a
/// SHA until new commits land on top. Anything else is `AmbiguousBranch`.
pub fn resolve_branch<'a>(
    sha: &str,
    candidates: &'a BTreeSet<String>,
    base_branch: &str,
) -> Result<&'a str> {
    let ambiguous = || Error::AmbiguousBranch {
        sha: sha.to_string(),
        candidates: candidates.iter().cloned().collect(),
    };

    match candidates.len() {
        1 => candidates.first().map(String::as_str).ok_or_else(ambiguous),
        2 => {
            let mut others = candidates.iter().filter(|name| *name != base_branch);
            match (others.next(), others.next()) {
                (Some(name), None) => Ok(name.as_str()),
                _ => Err(ambiguous()),
            }
        }
        _ => Err(ambiguous()),
    }
}
