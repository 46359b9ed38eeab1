pub mod alias;
pub mod config;
pub mod log;
pub mod open;
pub mod start;
pub mod tasks;
pub mod util;
pub mod worklogs;

use clap::{Args, Parser, Subcommand};

use crate::resolve::ResolutionContext;

#[derive(Parser)]
#[command(
    name = "logit",
    version,
    about = "Log work time to Jira from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log time to Jira
    Log(LogArgs),

    /// Start measuring time from this moment
    Start,

    /// Open task in browser
    Open {
        /// Alias or task key (falls back to --task/--alias/current branch)
        target: Option<String>,

        /// Jira task ID or URL
        #[arg(short, long, default_value = "")]
        task: String,

        /// Task by alias
        #[arg(short, long, default_value = "")]
        alias: String,

        /// Accept the task found in the branch name without asking
        #[arg(short, long)]
        force: bool,
    },

    /// List tasks assigned to me
    Tasks,

    /// List my worklogs
    Worklogs {
        /// Worklogs from today (default)
        #[arg(short, long)]
        today: bool,

        /// Worklogs from yesterday and today
        #[arg(short, long)]
        yesterday: bool,

        /// Worklogs from the last week
        #[arg(short, long)]
        week: bool,

        /// Worklogs from the last N days (at most 14)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Manage task aliases
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Configure the Jira connection
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Hours spent
    #[arg(short = 'H', long, default_value_t = 0, allow_negative_numbers = true)]
    pub hours: i64,

    /// Minutes spent
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub minutes: i64,

    /// Worklog comment
    #[arg(short, long, default_value = "")]
    pub comment: String,

    /// Jira task ID or URL
    #[arg(short, long, default_value = "")]
    pub task: String,

    /// Task by alias
    #[arg(short, long, default_value = "")]
    pub alias: String,

    /// Log time for yesterday
    #[arg(short, long)]
    pub yesterday: bool,

    /// Date in format dd-mm or dd.mm, present year is assumed
    #[arg(short, long, default_value = "")]
    pub date: String,

    /// Restart the time measurement after logging
    #[arg(short, long)]
    pub reset: bool,

    /// Accept the task found in the branch name without asking
    #[arg(short, long)]
    pub force: bool,
}

impl LogArgs {
    pub fn resolution_context(&self) -> ResolutionContext {
        ResolutionContext {
            task: self.task.clone(),
            alias: self.alias.clone(),
            hours: self.hours,
            minutes: self.minutes,
            date: self.date.clone(),
            yesterday: self.yesterday,
            force: self.force,
            reset: self.reset,
        }
    }
}

#[derive(Subcommand)]
pub enum AliasAction {
    /// Set an alias for a Jira task
    Set {
        alias: String,

        /// Task key or URL
        task: String,
    },

    /// Remove an alias
    Remove { alias: String },

    /// List all aliases
    List,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Prompt for Jira origin, email and access token
    Init,

    /// Set Jira origin (scheme + host)
    SetOrigin { origin: String },

    /// Set Jira access token
    SetToken { token: String },

    /// Set the environment variable holding the Jira token
    SetTokenEnvName { name: String },

    /// Set your Jira email
    SetEmail { email: String },

    /// Toggle confirmation of tasks found in the git branch name
    TrustGitBranch,

    /// Print the current configuration
    Show,
}
