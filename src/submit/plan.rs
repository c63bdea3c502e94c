//! Phase 2: Creation planning
//!
//! Splits a walked commit range into per-branch spans. Pure: all lookups go
//! through the already loaded [`RepoIndex`].

use crate::error::Result;
use crate::graph::{RepoIndex, resolve_branch};
use crate::types::Commit;
use tracing::debug;

/// A branch that needs a new pull request
#[derive(Debug, Clone)]
pub struct PrToCreate {
    /// Head branch for the new PR
    pub branch: String,
    /// Base branch (the previous link, or the trunk)
    pub base: String,
    /// First commit since the previous boundary; supplies title and body
    pub oldest: Commit,
    /// Commit at the branch tip
    pub newest: String,
}

/// One branch boundary found in the commit range
#[derive(Debug, Clone)]
pub enum CreateStep {
    /// Branch already has a PR, nothing to do
    Existing {
        /// Branch name
        branch: String,
        /// Existing PR number
        number: u64,
    },
    /// Branch needs a draft PR
    Create(PrToCreate),
}

impl CreateStep {
    /// Head branch for this step
    pub fn branch_name(&self) -> &str {
        match self {
            Self::Existing { branch, .. } => branch,
            Self::Create(create) => &create.branch,
        }
    }
}

impl std::fmt::Display for CreateStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Existing { branch, number } => write!(f, "keep {branch} (PR #{number})"),
            Self::Create(create) => write!(
                f,
                "create PR {} → {} ({})",
                create.branch,
                create.base,
                create.oldest.title()
            ),
        }
    }
}

/// Ordered steps for one `create` run
#[derive(Debug, Clone, Default)]
pub struct CreatePlan {
    /// Steps in dependency order (oldest branch first)
    pub steps: Vec<CreateStep>,
}

impl CreatePlan {
    /// Number of PRs the plan would create
    #[must_use]
    pub fn create_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, CreateStep::Create(_)))
            .count()
    }

    /// Check if the plan creates nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create_count() == 0
    }
}

/// Plan PR creation for `commits` (oldest first, as returned by the walker).
///
/// A commit that is the head of one or more branches closes a span. The span
/// becomes a `Create` step unless the branch already has a PR. The tip commit
/// ends the plan unless `include_tip` is set.
pub fn plan_creation(
    commits: &[Commit],
    tip_sha: &str,
    index: &RepoIndex,
    base_branch: &str,
    include_tip: bool,
) -> Result<CreatePlan> {
    let mut steps = Vec::new();
    let mut base = base_branch.to_string();
    let mut oldest: Option<&Commit> = None;

    for commit in commits {
        debug!(sha = %commit.sha, "examining commit");
        if commit.sha == tip_sha && !include_tip {
            debug!(sha = %commit.sha, "skipping tip branch");
            break;
        }
        let first = *oldest.get_or_insert(commit);

        let Some(candidates) = index.branches_at(&commit.sha) else {
            debug!(sha = %commit.sha, "commit is not a branch head");
            continue;
        };
        let branch = resolve_branch(&commit.sha, candidates, base_branch)?;

        if let Some(pr) = index.pr_for_sha(&commit.sha) {
            debug!(branch, sha = %commit.sha, number = pr.number, "branch already has PR");
            steps.push(CreateStep::Existing {
                branch: branch.to_string(),
                number: pr.number,
            });
        } else {
            steps.push(CreateStep::Create(PrToCreate {
                branch: branch.to_string(),
                base: base.clone(),
                oldest: first.clone(),
                newest: commit.sha.clone(),
            }));
        }

        branch.clone_into(&mut base);
        oldest = None;
    }

    Ok(CreatePlan { steps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Branch, PrRef, PrState, PullRequest};

    fn commit(sha: &str, parent: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            message: format!("{sha} title\n\n{sha} body"),
            parents: vec![parent.to_string()],
        }
    }

    fn branch(name: &str, sha: &str) -> Branch {
        Branch {
            name: name.to_string(),
            sha: sha.to_string(),
        }
    }

    fn pr(number: u64, head: &str, sha: &str) -> PullRequest {
        PullRequest {
            number,
            html_url: format!("https://github.com/o/r/pull/{number}"),
            title: head.to_string(),
            body: None,
            head: PrRef {
                name: head.to_string(),
                sha: sha.to_string(),
            },
            base: PrRef {
                name: "master".to_string(),
                sha: "m".to_string(),
            },
            mergeable: Some(true),
            merged: false,
            state: PrState::Open,
            is_draft: true,
            author: "alice".to_string(),
        }
    }

    #[test]
    fn test_spans_group_commits_between_branches() {
        let commits = vec![commit("a1", "m"), commit("a2", "a1"), commit("b1", "a2")];
        let index = RepoIndex::from_parts(
            vec![branch("master", "m"), branch("feat1", "a2"), branch("feat2", "b1")],
            vec![],
        );

        let plan = plan_creation(&commits, "b1", &index, "master", true).unwrap();
        assert_eq!(plan.create_count(), 2);

        let CreateStep::Create(first) = &plan.steps[0] else {
            panic!("expected create step");
        };
        assert_eq!(first.branch, "feat1");
        assert_eq!(first.base, "master");
        assert_eq!(first.oldest.sha, "a1");
        assert_eq!(first.newest, "a2");

        let CreateStep::Create(second) = &plan.steps[1] else {
            panic!("expected create step");
        };
        assert_eq!(second.base, "feat1");
        assert_eq!(second.oldest.sha, "b1");
    }

    #[test]
    fn test_tip_excluded_by_default() {
        let commits = vec![commit("a", "m"), commit("b", "a")];
        let index = RepoIndex::from_parts(vec![branch("feat1", "a"), branch("feat2", "b")], vec![]);

        let plan = plan_creation(&commits, "b", &index, "master", false).unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].branch_name(), "feat1");
    }

    #[test]
    fn test_existing_pr_advances_base() {
        let commits = vec![commit("a", "m"), commit("b", "a")];
        let index = RepoIndex::from_parts(
            vec![branch("feat1", "a"), branch("feat2", "b")],
            vec![pr(3, "feat1", "a")],
        );

        let plan = plan_creation(&commits, "b", &index, "master", true).unwrap();
        assert!(matches!(
            &plan.steps[0],
            CreateStep::Existing { branch, number: 3 } if branch == "feat1"
        ));
        let CreateStep::Create(second) = &plan.steps[1] else {
            panic!("expected create step");
        };
        assert_eq!(second.base, "feat1");
        assert_eq!(plan.steps[1].to_string(), "create PR feat2 → feat1 (b title)");
    }

    #[test]
    fn test_aliased_base_branch_resolves_to_other() {
        let commits = vec![commit("a", "m")];
        let index =
            RepoIndex::from_parts(vec![branch("master", "a"), branch("feat1", "a")], vec![]);

        let plan = plan_creation(&commits, "a", &index, "master", true).unwrap();
        assert_eq!(plan.steps[0].branch_name(), "feat1");
    }
}
