pub mod cli_ops;

pub use cli_ops::CliOps;

use crate::error::git_error::CommandFailedSnafu;
use crate::error::GitError;

/// Lookup of the branch currently checked out.
pub trait BranchLookup {
    /// Short name of the current branch (`feature/PROJ-1`, `main`, ...).
    fn current_branch(&self) -> Result<String, GitError>;
}

/// Branch lookup returning a fixed answer.
///
/// Public so code outside the crate can run the resolution pipeline without
/// a repository; `tests/log_flow_test.rs` relies on it.
#[derive(Debug, Clone)]
pub struct StaticBranch {
    branch: Option<String>,
}

impl StaticBranch {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: Some(branch.into()),
        }
    }

    /// A lookup that fails as if run outside a repository.
    pub fn not_a_repository() -> Self {
        Self { branch: None }
    }
}

impl BranchLookup for StaticBranch {
    fn current_branch(&self) -> Result<String, GitError> {
        match &self.branch {
            Some(branch) => Ok(branch.clone()),
            None => CommandFailedSnafu {
                message: "fatal: not a git repository",
            }
            .fail(),
        }
    }
}
