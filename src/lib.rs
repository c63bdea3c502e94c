//! prchain - chains of stacked pull requests on GitHub
//!
//! This library turns a linear stack of branches into a chain of dependent
//! pull requests and later lands that chain in order, waiting on CI and
//! moving each dependent PR onto the trunk as the PR below it merges.
//!
//! # Architecture
//!
//! - [`graph`]: commit walks, the branch/PR index and chain building
//! - [`submit`]: draft PR creation for a stack of branches
//! - [`merge`]: landing chains (status polling, readiness, merge)
//! - [`cascade`]: retargeting PRs stacked on a merged PR
//! - [`platform`]: the hosting platform interface and its GitHub client
//!
//! All hosting access goes through [`platform::PlatformService`], so every
//! operation runs unchanged against an in-memory fake. Nothing is persisted:
//! each run starts from a fresh snapshot of the repository.

pub mod auth;
pub mod cascade;
pub mod config;
pub mod error;
pub mod graph;
pub mod merge;
pub mod platform;
pub mod progress;
pub mod submit;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use types::*;
