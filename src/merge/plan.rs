//! Merge readiness - pure checks on already fetched data
//!
//! No I/O happens here: the executor fetches the PR, its CI state and the
//! base branch, then asks [`check_readiness`] what to do.

use crate::cascade::Retarget;
use crate::error::{Error, Result};
use crate::types::{Branch, CiState, MergeMethod, PullRequest};
use tracing::warn;

/// Verdict for one chain entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Merge it; `warnings` lists the checks that `force` overrode
    Ready {
        /// Overridden checks
        warnings: Vec<String>,
    },
    /// Stop the chain here without failing
    Blocked {
        /// Why the PR cannot be merged yet
        reasons: Vec<String>,
    },
}

/// One step taken (or reported, in dry-run mode) while landing a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStep {
    /// PR merged into its base
    Merge {
        /// PR number
        number: u64,
        /// PR title (for display)
        title: String,
        /// Merge method used
        method: MergeMethod,
        /// Checks overridden with `force`
        warnings: Vec<String>,
    },
    /// PR was merged before this run
    AlreadyMerged {
        /// PR number
        number: u64,
    },
    /// A dependent PR moved onto the merged PR's base
    RetargetBase(Retarget),
    /// PR cannot be merged yet; processing of the chain stops
    Skip {
        /// PR number
        number: u64,
        /// Why the PR was skipped
        reasons: Vec<String>,
    },
}

impl MergeStep {
    /// PR this step acts on
    pub const fn pr_number(&self) -> u64 {
        match self {
            Self::Merge { number, .. }
            | Self::AlreadyMerged { number }
            | Self::Skip { number, .. } => *number,
            Self::RetargetBase(retarget) => retarget.number,
        }
    }
}

impl std::fmt::Display for MergeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge {
                number,
                title,
                method,
                warnings,
            } => {
                write!(f, "{method} PR #{number}: {title}")?;
                if !warnings.is_empty() {
                    write!(f, " (forced: {})", warnings.join(", "))?;
                }
                Ok(())
            }
            Self::AlreadyMerged { number } => write!(f, "PR #{number} already merged"),
            Self::RetargetBase(retarget) => write!(f, "{retarget}"),
            Self::Skip { number, reasons } => {
                write!(f, "skip PR #{number}")?;
                if !reasons.is_empty() {
                    write!(f, ": {}", reasons.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Decide whether `pr` may be merged into `base`.
///
/// A failing status and a stale base ref or SHA are errors unless `force`
/// is set, in which case they become warnings. A PR with conflicts, or whose
/// mergeability the host has not computed yet, is blocked either way.
pub fn check_readiness(
    pr: &PullRequest,
    state: CiState,
    base: &Branch,
    force: bool,
) -> Result<Readiness> {
    let mut warnings = Vec::new();
    let mut forceable = |err: Error| -> Result<()> {
        if !force || !err.kind().is_forceable() {
            return Err(err);
        }
        warn!(number = pr.number, "because force was specified, ignoring: {err}");
        warnings.push(err.to_string());
        Ok(())
    };

    match state {
        CiState::Success => {}
        CiState::Pending | CiState::Failure => forceable(Error::StatusFailure {
            number: pr.number,
            state: state.to_string(),
        })?,
    }

    if pr.base.name != base.name {
        forceable(Error::StaleBase {
            number: pr.number,
            field: "ref",
            actual: pr.base.name.clone(),
            expected: base.name.clone(),
        })?;
    }
    if pr.base.sha != base.sha {
        forceable(Error::StaleBase {
            number: pr.number,
            field: "SHA",
            actual: pr.base.sha.clone(),
            expected: base.sha.clone(),
        })?;
    }

    match pr.mergeable {
        Some(true) => Ok(Readiness::Ready { warnings }),
        Some(false) => Ok(Readiness::Blocked {
            reasons: vec!["has merge conflicts".to_string()],
        }),
        None => Ok(Readiness::Blocked {
            reasons: vec!["mergeability not yet computed".to_string()],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{PrRef, PrState};

    fn pr(base: &str, base_sha: &str, mergeable: Option<bool>) -> PullRequest {
        PullRequest {
            number: 10,
            html_url: "https://github.com/o/r/pull/10".to_string(),
            title: "Add parser".to_string(),
            body: Some("body".to_string()),
            head: PrRef {
                name: "feat1".to_string(),
                sha: "a".to_string(),
            },
            base: PrRef {
                name: base.to_string(),
                sha: base_sha.to_string(),
            },
            mergeable,
            merged: false,
            state: PrState::Open,
            is_draft: false,
            author: "alice".to_string(),
        }
    }

    fn master(sha: &str) -> Branch {
        Branch {
            name: "master".to_string(),
            sha: sha.to_string(),
        }
    }

    #[test]
    fn test_ready() {
        let verdict = check_readiness(
            &pr("master", "m", Some(true)),
            CiState::Success,
            &master("m"),
            false,
        );
        assert_eq!(verdict.unwrap(), Readiness::Ready { warnings: vec![] });
    }

    #[test]
    fn test_failure_without_force() {
        let err = check_readiness(
            &pr("master", "m", Some(true)),
            CiState::Failure,
            &master("m"),
            false,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StatusFailure);
    }

    #[test]
    fn test_stale_sha_without_force() {
        let err = check_readiness(
            &pr("master", "old", Some(true)),
            CiState::Success,
            &master("m"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::StaleBase { field: "SHA", .. }));
    }

    #[test]
    fn test_force_downgrades_to_warnings() {
        let verdict = check_readiness(
            &pr("feat0", "old", Some(true)),
            CiState::Failure,
            &master("m"),
            true,
        )
        .unwrap();
        let Readiness::Ready { warnings } = verdict else {
            panic!("expected ready");
        };
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_conflicts_block_even_with_force() {
        let verdict = check_readiness(
            &pr("master", "m", Some(false)),
            CiState::Success,
            &master("m"),
            true,
        );
        assert!(matches!(verdict.unwrap(), Readiness::Blocked { .. }));
        let verdict =
            check_readiness(&pr("master", "m", None), CiState::Success, &master("m"), false);
        assert!(matches!(verdict.unwrap(), Readiness::Blocked { .. }));
    }

    #[test]
    fn test_step_display() {
        let step = MergeStep::Merge {
            number: 10,
            title: "Add parser".to_string(),
            method: MergeMethod::Squash,
            warnings: vec![],
        };
        assert_eq!(step.to_string(), "squash PR #10: Add parser");
        let step = MergeStep::Skip {
            number: 11,
            reasons: vec!["has merge conflicts".to_string()],
        };
        assert_eq!(step.to_string(), "skip PR #11: has merge conflicts");
    }
}
