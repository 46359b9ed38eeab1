use snafu::ResultExt;

use crate::cli::util::{format_table, open_config};
use crate::cli::AliasAction;
use crate::config::ConfigStore;
use crate::error::logit_error::{ConfigSnafu, PromptSnafu, ResolveSnafu};
use crate::error::resolve_error::OperationAbortedSnafu;
use crate::error::Result;
use crate::prompt::{Prompter, StdinPrompter};
use crate::resolve::{extract_task_key, TaskKey};

pub fn run(action: AliasAction) -> Result<()> {
    let mut config = open_config()?;
    match action {
        AliasAction::Set { alias, task } => {
            let key = set_alias(&mut config, &mut StdinPrompter::new(), &alias, &task)?;
            println!("Alias {alias} now points to {key}.");
        }
        AliasAction::Remove { alias } => {
            let task = config.remove_alias(&alias).context(ConfigSnafu)?;
            println!("Removed alias {alias} ({task}).");
        }
        AliasAction::List => print!("{}", list_aliases(&config)),
    }
    Ok(())
}

/// Point `alias` at the task found in `task`, asking before replacing an
/// existing target.
pub fn set_alias(
    config: &mut dyn ConfigStore,
    prompter: &mut dyn Prompter,
    alias: &str,
    task: &str,
) -> Result<TaskKey> {
    let key = extract_task_key(task).context(ResolveSnafu)?;

    if let Some(existing) = config.task_for_alias(alias) {
        if existing == key.as_str() {
            return Ok(key);
        }
        let message = format!("Alias {alias} already points to {existing}. Overwrite with {key}?");
        if !prompter.ask_yes_no(&message).context(PromptSnafu)? {
            return Err(OperationAbortedSnafu.build()).context(ResolveSnafu);
        }
    }

    config.add_alias(alias, key.as_str()).context(ConfigSnafu)?;
    Ok(key)
}

pub fn list_aliases(config: &dyn ConfigStore) -> String {
    if config.aliases().is_empty() {
        return "No aliases defined.\n".to_string();
    }
    let rows: Vec<Vec<String>> = config
        .aliases()
        .iter()
        .map(|(alias, task)| vec![alias.clone(), task.clone()])
        .collect();
    format_table(&rows)
}
