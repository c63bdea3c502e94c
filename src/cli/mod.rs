//! CLI commands
//!
//! Command implementations for the `prchain` binary.

mod chains;
mod context;
mod create;
mod land;
mod progress;
mod rebase;
pub mod style;
mod submit;

pub use chains::run_chains;
pub use context::{GlobalArgs, PollArgs};
pub use create::{CreateCommandOptions, run_create};
pub use land::{LandCommandOptions, run_land};
pub use progress::CliProgress;
pub use rebase::run_rebase;
pub use submit::run_submit;

use prchain::types::MergeMethod;

/// Merge method flag values
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    /// Create a merge commit
    Merge,
    /// Rebase commits onto the base branch
    Rebase,
    /// Squash all commits into one
    Squash,
}

impl From<MethodArg> for MergeMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Merge => Self::Merge,
            MethodArg::Rebase => Self::Rebase,
            MethodArg::Squash => Self::Squash,
        }
    }
}
