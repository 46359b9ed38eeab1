use colored::Colorize;
use snafu::ResultExt;

use crate::cli::util::open_config;
use crate::cli::ConfigAction;
use crate::config::ConfigStore;
use crate::error::logit_error::{ConfigSnafu, PromptSnafu};
use crate::error::Result;
use crate::prompt::{Prompter, StdinPrompter};

pub fn run(action: ConfigAction) -> Result<()> {
    let mut config = open_config()?;
    match action {
        ConfigAction::Init => {
            init(&mut config, &mut StdinPrompter::new())?;
            println!(
                "{}",
                format!("Configuration saved to {}", config.path().display()).green()
            );
        }
        ConfigAction::SetOrigin { origin } => {
            config.set_jira_origin(&origin).context(ConfigSnafu)?;
        }
        ConfigAction::SetToken { token } => {
            config.set_jira_token(&token).context(ConfigSnafu)?;
        }
        ConfigAction::SetTokenEnvName { name } => {
            config.set_jira_token_env_name(&name).context(ConfigSnafu)?;
        }
        ConfigAction::SetEmail { email } => {
            config.set_jira_email(&email).context(ConfigSnafu)?;
        }
        ConfigAction::TrustGitBranch => {
            let trusted = config.toggle_trust_git_branch().context(ConfigSnafu)?;
            if trusted {
                println!("Tasks found in branch names will be used without asking.");
            } else {
                println!("Tasks found in branch names will need confirmation.");
            }
        }
        ConfigAction::Show => print!("{}", show(&config)),
    }
    Ok(())
}

/// Ask for origin, email and either a token or the environment variable
/// holding one, then save them in one write.
pub fn init(config: &mut dyn ConfigStore, prompter: &mut dyn Prompter) -> Result<()> {
    let origin = prompter
        .ask_string("", "Jira origin (e.g. https://company.atlassian.net):")
        .context(PromptSnafu)?;
    let email = prompter.ask_string("", "Jira email:").context(PromptSnafu)?;

    let from_env = prompter
        .ask_yes_no("Read the Jira API token from an environment variable?")
        .context(PromptSnafu)?;
    let (token, token_env_name) = if from_env {
        let name = prompter
            .ask_string("", "Environment variable name:")
            .context(PromptSnafu)?;
        (String::new(), name)
    } else {
        let token = prompter
            .ask_string("", "Jira API token:")
            .context(PromptSnafu)?;
        (token, String::new())
    };

    config
        .update(&mut |c| {
            c.jira_origin = origin.clone();
            c.jira_email = email.clone();
            c.jira_token = token.clone();
            c.jira_token_env_name = token_env_name.clone();
        })
        .context(ConfigSnafu)
}

/// Current settings, with the token masked.
pub fn show(config: &dyn ConfigStore) -> String {
    let mut out = String::new();
    out.push_str(&format!("jira_origin: {}\n", config.jira_origin()));
    out.push_str(&format!("jira_email: {}\n", config.jira_email()));
    out.push_str(&format!("jira_token: {}\n", mask(config.jira_token())));
    out.push_str(&format!(
        "jira_token_env_name: {}\n",
        config.jira_token_env_name()
    ));
    out.push_str(&format!("trust_git_branch: {}\n", config.trust_git_branch()));
    match config.snapshot() {
        Some(at) => out.push_str(&format!("snapshot: {}\n", at.to_rfc3339())),
        None => out.push_str("snapshot: none\n"),
    }
    out.push_str(&format!("aliases: {}\n", config.aliases().len()));
    out
}

fn mask(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}
