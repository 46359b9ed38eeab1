use crate::config::ConfigStore;
use crate::error::resolve_error::{NoTargetToLogWorkSnafu, OperationAbortedSnafu, PromptSnafu};
use crate::error::ResolveError;
use crate::git::BranchLookup;
use crate::prompt::Prompter;
use crate::resolve::task_key::{extract_task_key, TaskKey};
use crate::resolve::ResolutionContext;
use snafu::ResultExt;

pub const PROVIDE_TASK_MESSAGE: &str = "Provide task ID or task URL:";

/// Resolve the task to log against.
///
/// Exactly one source is consulted, in order of precedence: the alias flag,
/// the task flag, the current git branch. A failed source gets one prompt
/// and never falls through to a lower-precedence one.
pub fn determine_task(
    ctx: &ResolutionContext,
    config: &dyn ConfigStore,
    prompter: &mut dyn Prompter,
    branch: &dyn BranchLookup,
) -> Result<TaskKey, ResolveError> {
    if !ctx.alias.is_empty() {
        return task_from_alias(&ctx.alias, config, prompter);
    }

    if !ctx.task.is_empty() {
        return match extract_task_key(&ctx.task) {
            Ok(key) => Ok(key),
            Err(_) => prompt_for_task(prompter, "There is no Jira task in value passed to task flag."),
        };
    }

    task_from_branch(ctx.force, config, prompter, branch)
}

fn task_from_alias(
    alias: &str,
    config: &dyn ConfigStore,
    prompter: &mut dyn Prompter,
) -> Result<TaskKey, ResolveError> {
    if let Some(task) = config.task_for_alias(alias) {
        tracing::debug!(alias, task, "task resolved from alias");
        return Ok(TaskKey::from_stored(task));
    }

    let retry = prompter
        .ask_string(
            &format!("Alias {alias} was not found."),
            "Please pass proper alias this time:",
        )
        .context(PromptSnafu)?;
    match config.task_for_alias(&retry) {
        Some(task) => Ok(TaskKey::from_stored(task)),
        None => {
            tracing::info!(alias = %retry, "alias not found after retry");
            NoTargetToLogWorkSnafu.fail()
        }
    }
}

fn task_from_branch(
    force: bool,
    config: &dyn ConfigStore,
    prompter: &mut dyn Prompter,
    branch: &dyn BranchLookup,
) -> Result<TaskKey, ResolveError> {
    let name = match branch.current_branch() {
        Ok(name) => name,
        Err(e) => {
            tracing::debug!("branch lookup failed: {e}");
            return prompt_for_task(
                prompter,
                "Current directory is not a git repository or something failed during branch name extraction.",
            );
        }
    };

    let Ok(key) = extract_task_key(&name) else {
        return prompt_for_task(prompter, "Current branch name does not contain task ID.");
    };

    if force || config.trust_git_branch() {
        tracing::debug!(task = %key, branch = %name, "trusting task from branch");
        return Ok(key);
    }

    let proceed = prompter
        .ask_yes_no(&format!("Detected task ID {key} in current branch name."))
        .context(PromptSnafu)?;
    if proceed {
        Ok(key)
    } else {
        OperationAbortedSnafu.fail()
    }
}

fn prompt_for_task(prompter: &mut dyn Prompter, info: &str) -> Result<TaskKey, ResolveError> {
    let answer = prompter
        .ask_string(info, PROVIDE_TASK_MESSAGE)
        .context(PromptSnafu)?;
    extract_task_key(&answer)
}
