//! Draft PR creation for a stack of branches
//!
//! Three-phase pattern:
//! 1. Walk - fetch the commits between trunk and the tip branch
//! 2. Plan - split them into per-branch spans (pure)
//! 3. Execute - create the missing PRs in order

mod execute;
mod plan;

pub use execute::{CreateOptions, CreateResult, create_chain, new_pull_request};
pub use plan::{CreatePlan, CreateStep, PrToCreate, plan_creation};
