pub mod user_config;

pub use user_config::{FileConfig, UserConfig};

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::error::config_error::AliasNotFoundSnafu;
use crate::error::ConfigError;

/// Handle on the persisted configuration record.
///
/// Setters persist immediately: every write replaces the whole record and the
/// last writer wins.
pub trait ConfigStore {
    fn config(&self) -> &UserConfig;

    /// Apply `change` to the record and persist it.
    fn update(&mut self, change: &mut dyn FnMut(&mut UserConfig)) -> Result<(), ConfigError>;

    fn jira_origin(&self) -> &str {
        &self.config().jira_origin
    }

    fn jira_email(&self) -> &str {
        &self.config().jira_email
    }

    fn jira_token(&self) -> &str {
        &self.config().jira_token
    }

    fn jira_token_env_name(&self) -> &str {
        &self.config().jira_token_env_name
    }

    fn aliases(&self) -> &BTreeMap<String, String> {
        &self.config().aliases
    }

    fn task_for_alias(&self, alias: &str) -> Option<&str> {
        self.config().aliases.get(alias).map(String::as_str)
    }

    fn trust_git_branch(&self) -> bool {
        self.config().trust_git_branch
    }

    fn snapshot(&self) -> Option<DateTime<FixedOffset>> {
        self.config().snapshot
    }

    fn set_snapshot(&mut self, at: DateTime<FixedOffset>) -> Result<(), ConfigError> {
        self.update(&mut |c| c.snapshot = Some(at))
    }

    fn set_jira_origin(&mut self, origin: &str) -> Result<(), ConfigError> {
        self.update(&mut |c| c.jira_origin = origin.to_string())
    }

    fn set_jira_email(&mut self, email: &str) -> Result<(), ConfigError> {
        self.update(&mut |c| c.jira_email = email.to_string())
    }

    fn set_jira_token(&mut self, token: &str) -> Result<(), ConfigError> {
        self.update(&mut |c| c.jira_token = token.to_string())
    }

    fn set_jira_token_env_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.update(&mut |c| c.jira_token_env_name = name.to_string())
    }

    fn add_alias(&mut self, alias: &str, task: &str) -> Result<(), ConfigError> {
        self.update(&mut |c| {
            c.aliases.insert(alias.to_string(), task.to_string());
        })
    }

    /// Remove an alias, returning the task it pointed at.
    fn remove_alias(&mut self, alias: &str) -> Result<String, ConfigError> {
        let Some(task) = self.config().aliases.get(alias).cloned() else {
            return AliasNotFoundSnafu { alias }.fail();
        };
        self.update(&mut |c| {
            c.aliases.remove(alias);
        })?;
        Ok(task)
    }

    /// Flip the trust-git-branch preference and return the new value.
    fn toggle_trust_git_branch(&mut self) -> Result<bool, ConfigError> {
        self.update(&mut |c| c.trust_git_branch = !c.trust_git_branch)?;
        Ok(self.trust_git_branch())
    }
}

/// Configuration kept only in memory, never touching `~/.logit`.
///
/// Exported for the integration tests and for embedding the `log` pipeline.
#[derive(Debug, Default, Clone)]
pub struct MemoryConfig {
    config: UserConfig,
    /// Number of persisted writes.
    pub saves: usize,
}

impl MemoryConfig {
    pub fn new(config: UserConfig) -> Self {
        Self { config, saves: 0 }
    }
}

impl ConfigStore for MemoryConfig {
    fn config(&self) -> &UserConfig {
        &self.config
    }

    fn update(&mut self, change: &mut dyn FnMut(&mut UserConfig)) -> Result<(), ConfigError> {
        change(&mut self.config);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_add_then_lookup() {
        let mut store = MemoryConfig::default();
        store.add_alias("bugfix", "BUG-456").unwrap();
        assert_eq!(store.task_for_alias("bugfix"), Some("BUG-456"));
        assert_eq!(store.task_for_alias("other"), None);
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn remove_missing_alias_fails_without_saving() {
        let mut store = MemoryConfig::default();
        let err = store.remove_alias("nope").unwrap_err();
        assert!(matches!(err, ConfigError::AliasNotFound { ref alias, .. } if alias == "nope"));
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn remove_alias_returns_previous_task() {
        let mut store = MemoryConfig::default();
        store.add_alias("bugfix", "BUG-456").unwrap();
        assert_eq!(store.remove_alias("bugfix").unwrap(), "BUG-456");
        assert!(store.aliases().is_empty());
    }

    #[test]
    fn toggle_trust_git_branch_flips() {
        let mut store = MemoryConfig::default();
        assert!(store.toggle_trust_git_branch().unwrap());
        assert!(!store.toggle_trust_git_branch().unwrap());
    }
}
