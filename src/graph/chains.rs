//! Pull request chains
//!
//! A chain is a strictly linear stack: the root PR targets the trunk branch
//! and each following PR is based on the previous one's head commit. Only one
//! PR may be stacked directly on any commit; a branching stack has no single
//! merge order and is rejected.

use crate::error::{Error, Result};
use crate::types::PullRequest;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use tracing::{debug, warn};

/// Head SHAs of one stack, root (based on trunk) to tip
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    /// Head SHAs in merge order
    pub heads: Vec<String>,
}

impl Chain {
    /// Number of PRs in the chain
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// Head SHA of the PR based on trunk
    pub fn root(&self) -> Option<&str> {
        self.heads.first().map(String::as_str)
    }

    /// Head SHAs in merge order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.heads.iter().map(String::as_str)
    }
}

/// Map each base SHA to the single PR head stacked on it.
fn dependency_map<S: BuildHasher>(
    prs: &HashMap<String, PullRequest, S>,
    trunk: &str,
) -> Result<HashMap<String, String>> {
    let mut ordered: Vec<&PullRequest> = prs.values().collect();
    ordered.sort_by_key(|pr| pr.number);

    let mut deps: HashMap<String, String> = HashMap::new();
    for pr in ordered {
        if pr.base.name == trunk {
            continue;
        }
        if let Some(existing) = deps.get(&pr.base.sha) {
            return Err(Error::NonLinearDependency {
                base: pr.base.sha.clone(),
                first: existing.clone(),
                second: pr.head.sha.clone(),
            });
        }
        deps.insert(pr.base.sha.clone(), pr.head.sha.clone());
    }
    debug!(?deps, "dependency map");
    Ok(deps)
}

/// Follow the dependency map from `start` until nothing is stacked on top.
fn follow(start: &str, deps: &HashMap<String, String>) -> Chain {
    let mut heads = vec![start.to_string()];
    let mut seen: HashSet<&str> = HashSet::from([start]);
    let mut id = start;
    while let Some(next) = deps.get(id) {
        if !seen.insert(next) {
            warn!(sha = %next, "dependency cycle, truncating chain");
            break;
        }
        debug!(sha = %next, "appending");
        heads.push(next.clone());
        id = next;
    }
    Chain { heads }
}

/// Partition PRs (keyed by head SHA) into disjoint linear chains.
///
/// PRs whose base branch is `trunk` start a chain. Chains are returned in
/// root PR number order. PRs that cannot be reached from any root (their
/// base belongs to someone else's PR, say) are left out.
pub fn build_chains<S: BuildHasher>(
    prs: &HashMap<String, PullRequest, S>,
    trunk: &str,
) -> Result<Vec<Chain>> {
    let deps = dependency_map(prs, trunk)?;

    let mut roots: Vec<&PullRequest> = prs.values().filter(|pr| pr.base.name == trunk).collect();
    roots.sort_by_key(|pr| pr.number);
    debug!(roots = ?roots.iter().map(|pr| pr.number).collect::<Vec<_>>(), "chain roots");

    let chains: Vec<Chain> = roots
        .into_iter()
        .map(|root| follow(&root.head.sha, &deps))
        .collect();

    let placed: usize = chains.iter().map(Chain::len).sum();
    if placed < prs.len() {
        debug!(
            unplaced = prs.len() - placed,
            "some PRs are not stacked on {trunk} through any chain"
        );
    }

    for chain in &chains {
        debug!(?chain, "chain");
    }
    Ok(chains)
}

/// The chain starting at `head_sha`: that PR plus everything stacked on it.
///
/// Only commits on this chain are checked for linearity, so branching
/// stacks elsewhere in `prs` do not matter.
pub fn chain_from<S: BuildHasher>(
    prs: &HashMap<String, PullRequest, S>,
    head_sha: &str,
    trunk: &str,
) -> Result<Chain> {
    let mut dependents: HashMap<&str, Vec<&PullRequest>> = HashMap::new();
    for pr in prs.values().filter(|pr| pr.base.name != trunk) {
        dependents.entry(pr.base.sha.as_str()).or_default().push(pr);
    }
    for stacked in dependents.values_mut() {
        stacked.sort_by_key(|pr| pr.number);
    }

    let mut heads = vec![head_sha.to_string()];
    let mut seen: HashSet<&str> = HashSet::from([head_sha]);
    let mut id = head_sha;
    while let Some(stacked) = dependents.get(id) {
        let [next] = stacked.as_slice() else {
            return Err(Error::NonLinearDependency {
                base: id.to_string(),
                first: stacked[0].head.sha.clone(),
                second: stacked[1].head.sha.clone(),
            });
        };
        let next = next.head.sha.as_str();
        if !seen.insert(next) {
            warn!(sha = %next, "dependency cycle, truncating chain");
            break;
        }
        debug!(sha = %next, "appending");
        heads.push(next.to_string());
        id = next;
    }
    Ok(Chain { heads })
}
