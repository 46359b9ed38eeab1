use std::path::PathBuf;
use std::process::Command;

use crate::error::git_error::CommandFailedSnafu;
use crate::error::GitError;
use crate::git::BranchLookup;

/// Git operations implemented by shelling out to the `git` CLI.
pub struct CliOps {
    pub repo_dir: PathBuf,
}

impl CliOps {
    pub fn new(repo_dir: PathBuf) -> Self {
        Self { repo_dir }
    }

    /// Operate on the process working directory.
    pub fn from_current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Trimmed stdout of `git <args>` run in the repository directory.
    fn git_stdout(&self, args: &[&str]) -> Result<String, GitError> {
        let output = match Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return CommandFailedSnafu {
                    message: format!("cannot run git {}: {e}", args.join(" ")),
                }
                .fail()
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return CommandFailedSnafu {
                message: format!("git {} ({}): {}", args.join(" "), output.status, stderr.trim()),
            }
            .fail();
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl BranchLookup for CliOps {
    fn current_branch(&self) -> Result<String, GitError> {
        let branch = self.git_stdout(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        tracing::debug!(branch = %branch, "resolved current git branch");
        Ok(branch)
    }
}
