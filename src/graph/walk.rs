//! Commit chain walking
//!
//! Follows first-parent links from a start commit back to an end commit.
//! Every commit on the path must have exactly one parent.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::Commit;
use tracing::debug;

/// Hop limit for walks between branch tips
pub const MAX_CHAIN_LENGTH: usize = 150;

/// Hop limit when collecting commit messages for a merge
pub const MAX_MESSAGE_COMMITS: usize = 20;

/// Walk from `start` back to `end`, returning the commits in between.
///
/// The result is oldest first, includes `start` and excludes `end`.
/// `walk_commit_chain(x, x)` is empty.
///
/// Fails with `NonLinearHistory` on the first commit that does not have
/// exactly one parent, and with `ChainTooLong` if `end` is not reached
/// within `limit` commits (usually an `end` that is not an ancestor).
pub async fn walk_commit_chain(
    platform: &dyn PlatformService,
    start: &str,
    end: &str,
    limit: usize,
) -> Result<Vec<Commit>> {
    debug!(start, end, limit, "walking commit chain");
    let mut chain = Vec::new();
    let mut pos = start.to_string();

    while pos != end {
        if chain.len() >= limit {
            return Err(Error::ChainTooLong {
                start: start.to_string(),
                end: end.to_string(),
                limit,
            });
        }

        let commit = platform
            .get_commit(&pos)
            .await
            .map_err(|e| Error::CommitFetchFailed {
                sha: pos.clone(),
                source: Box::new(e),
            })?;

        let [parent] = commit.parents.as_slice() else {
            return Err(Error::NonLinearHistory {
                sha: pos,
                parents: commit.parents.len(),
            });
        };

        debug!(sha = %pos, parent = %parent, "walked commit");
        pos.clone_from(parent);
        chain.push(commit);
    }

    chain.reverse();
    Ok(chain)
}

/// SHA-only form of [`walk_commit_chain`]
pub async fn walk_commits(
    platform: &dyn PlatformService,
    start: &str,
    end: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let commits = walk_commit_chain(platform, start, end, limit).await?;
    Ok(commits.into_iter().map(|c| c.sha).collect())
}
