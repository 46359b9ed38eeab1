use snafu::ResultExt;

use crate::cli::util::open_config;
use crate::config::ConfigStore;
use crate::error::logit_error::{BrowserOriginMissingSnafu, OpenBrowserSnafu, ResolveSnafu};
use crate::error::Result;
use crate::git::{BranchLookup, CliOps};
use crate::prompt::{Prompter, StdinPrompter};
use crate::resolve::{determine_task, extract_task_key, ResolutionContext, TaskKey};

/// Where `open` should point the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    Task(TaskKey),
    Nothing,
}

pub fn run(target: Option<String>, task: String, alias: String, force: bool) -> Result<()> {
    let config = open_config()?;
    let mut prompter = StdinPrompter::new();
    let branch = CliOps::from_current_dir();

    let ctx = ResolutionContext {
        task,
        alias,
        force,
        ..ResolutionContext::default()
    };
    let target = resolve_target(target.as_deref(), &ctx, &config, &mut prompter, &branch)?;
    let OpenTarget::Task(key) = target else {
        println!("No task to open.");
        return Ok(());
    };

    let url = browse_url(config.jira_origin(), &key)?;
    tracing::debug!(%url, "opening browser");
    open_in_browser(&url, |url| ::open::that(url))
}

/// Pick the task to open.
///
/// A positional argument is tried as an alias first, then as a task key or
/// URL. Without one, the usual task resolution runs.
pub fn resolve_target(
    positional: Option<&str>,
    ctx: &ResolutionContext,
    config: &dyn ConfigStore,
    prompter: &mut dyn Prompter,
    branch: &dyn BranchLookup,
) -> Result<OpenTarget> {
    if let Some(arg) = positional.filter(|a| !a.is_empty()) {
        if let Some(task) = config.task_for_alias(arg) {
            return Ok(task_or_nothing(TaskKey::from_stored(task)));
        }
        if let Ok(key) = extract_task_key(arg) {
            return Ok(OpenTarget::Task(key));
        }
        tracing::debug!(arg, "argument is neither an alias nor a task key");
    }

    let key = determine_task(ctx, config, prompter, branch).context(ResolveSnafu)?;
    Ok(task_or_nothing(key))
}

fn task_or_nothing(key: TaskKey) -> OpenTarget {
    if key.is_empty() {
        OpenTarget::Nothing
    } else {
        OpenTarget::Task(key)
    }
}

/// `<origin>/browse/<key>`
pub fn browse_url(origin: &str, key: &TaskKey) -> Result<String> {
    let origin = origin.trim_end_matches('/');
    if origin.is_empty() {
        return BrowserOriginMissingSnafu.fail();
    }
    Ok(format!("{origin}/browse/{key}"))
}

/// Hand `url` to `opener`, the system browser outside tests.
fn open_in_browser(url: &str, opener: impl FnOnce(&str) -> std::io::Result<()>) -> Result<()> {
    opener(url).context(OpenBrowserSnafu)
}
