//! Commit ancestry and pull-request dependency graphs
//!
//! - [`walk`]: parent-link walks between two commits
//! - [`index`]: branch and PR lookup tables for one run
//! - [`chains`]: partitioning PRs into linear stacks

mod chains;
mod index;
mod walk;

pub use chains::{Chain, build_chains, chain_from};
pub use index::{RepoIndex, resolve_branch};
pub use walk::{
    MAX_CHAIN_LENGTH, MAX_MESSAGE_COMMITS, walk_commit_chain, walk_commits,
};
