use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(logit_error))]
pub enum LogitError {
    #[snafu(display("config error: {source}"))]
    Config {
        source: ConfigError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("{source}"))]
    Resolve {
        source: ResolveError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("jira error: {source}"))]
    Jira {
        source: JiraError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("{source}"))]
    Prompt {
        source: PromptError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("before trying to open browser configure Jira origin"))]
    BrowserOriginMissing {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("error opening browser: {source}"))]
    OpenBrowser {
        source: std::io::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

/// Failures of the task/duration/date resolution pipeline.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(resolve_error))]
pub enum ResolveError {
    #[snafu(display("{first} and {second} flags are mutually exclusive"))]
    MutuallyExclusiveFlags {
        first: &'static str,
        second: &'static str,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("unable to log time from snapshot for day other than today"))]
    SnapshotDateMismatch {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("duration to log is invalid"))]
    InvalidDuration {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display(
        "invalid date format {value:?} passed with date flag; accepted format either dd.mm or dd-mm"
    ))]
    InvalidDateFormat {
        value: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("invalid month: {month}"))]
    InvalidMonth {
        month: u32,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("invalid day {day} for month {month}"))]
    InvalidDay {
        day: u32,
        month: u32,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("no Jira task key found in {input:?}"))]
    NoJiraTask {
        input: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("no target to log work"))]
    NoTargetToLogWork {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("no start time saved (run `logit start` first)"))]
    NoSnapshot {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("operation aborted by user"))]
    OperationAborted {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("{source}"))]
    Prompt {
        source: PromptError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("only one of today, yesterday, week and days flags is allowed"))]
    ConflictingWorklogsFlags {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("can fetch worklogs from max {max} days, got {days}"))]
    TooBigDayRange {
        days: u32,
        max: u32,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(prompt_error))]
pub enum PromptError {
    #[snafu(display("error scanning user input"))]
    EmptyInput {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("wrong approve input {input:?}, expected y or n"))]
    InvalidApproval {
        input: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to read user input: {source}"))]
    ReadInput {
        source: std::io::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(git_error))]
pub enum GitError {
    #[snafu(display("git command failed: {message}"))]
    CommandFailed {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(config_error))]
pub enum ConfigError {
    #[snafu(display("cannot determine home directory"))]
    NoHomeDirectory {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to serialize config: {source}"))]
    SerializeConfig {
        source: toml::ser::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("alias {alias} not found on aliases list"))]
    AliasNotFound {
        alias: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(jira_error))]
pub enum JiraError {
    #[snafu(display("before trying this operation configure Jira email"))]
    EmailNotConfigured {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("before trying to connect to Jira configure Jira token"))]
    TokenNotConfigured {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("token env variable {name} is configured but it's not set in your environment"))]
    TokenEnvEmpty {
        name: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("before trying to connect to Jira configure Jira origin"))]
    OriginNotConfigured {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("HTTP error: {source}"))]
    Transport {
        source: Box<ureq::Transport>,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to log time: {body}"))]
    LogTimeFailed {
        status: u16,
        body: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to fetch {what} (status {status}): {body}"))]
    RequestFailed {
        what: String,
        status: u16,
        body: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to parse response: {message}"))]
    ParseResponse {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

pub type Result<T, E = LogitError> = std::result::Result<T, E>;
