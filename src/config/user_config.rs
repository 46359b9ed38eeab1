use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::config::ConfigStore;
use crate::error::config_error::{
    NoHomeDirectorySnafu, ParseConfigSnafu, ReadFileSnafu, SerializeConfigSnafu, WriteFileSnafu,
};
use crate::error::ConfigError;
use snafu::ResultExt;

const CONFIG_DIR: &str = ".logit";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "LOGIT_CONFIG";

/// User-level config stored at ~/.logit/config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserConfig {
    pub jira_origin: String,
    pub jira_email: String,
    pub jira_token: String,
    /// When set, the token is read from this environment variable instead.
    pub jira_token_env_name: String,
    pub trust_git_branch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<DateTime<FixedOffset>>,
    pub aliases: BTreeMap<String, String>,
}

impl UserConfig {
    /// Path to the user config file: $LOGIT_CONFIG, else ~/.logit/config.toml.
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let Some(home) = std::env::var_os("HOME").map(PathBuf::from) else {
            return NoHomeDirectorySnafu.fail();
        };
        // A relative HOME would put the config under the working directory.
        if !home.is_absolute() {
            return NoHomeDirectorySnafu.fail();
        }
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields the default config.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        toml::from_str(&contents).context(ParseConfigSnafu { path })
    }

    /// Save to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self).context(SerializeConfigSnafu)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context(WriteFileSnafu { path: parent })?;
        }
        std::fs::write(path, contents).context(WriteFileSnafu { path })?;
        Ok(())
    }
}

/// Configuration persisted to a TOML file.
#[derive(Debug)]
pub struct FileConfig {
    path: PathBuf,
    config: UserConfig,
}

impl FileConfig {
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        let config = UserConfig::load_from(&path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self { path, config })
    }

    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(UserConfig::path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfig {
    fn config(&self) -> &UserConfig {
        &self.config
    }

    fn update(&mut self, change: &mut dyn FnMut(&mut UserConfig)) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        change(&mut next);
        next.save_to(&self.path)?;
        self.config = next;
        Ok(())
    }
}
