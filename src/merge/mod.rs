//! Merge engine for stacked PRs
//!
//! Three-phase pattern matching submit/:
//! 1. Gather - fetch the PR, wait for CI, fetch the base branch (effectful)
//! 2. Check - decide readiness from the gathered data (pure)
//! 3. Execute - merge and retarget dependents (effectful)

mod execute;
mod message;
mod plan;
mod poll;

pub use execute::{LandingResult, MergeOptions, land_chain, land_chains, land_from_pr};
pub use message::{compose_message, merge_message};
pub use plan::{MergeStep, Readiness, check_readiness};
pub use poll::{DEFAULT_POLL_INTERVAL, PollPolicy, wait_for_status};
