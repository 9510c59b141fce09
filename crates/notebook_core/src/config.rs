//! Runtime configuration for the notebook service.
//!
//! # Responsibility
//! - Provide defaults for store location, lookup endpoint and logging.
//! - Merge an optional TOML file with `NOTEBOOK_*` environment overrides.
//!
//! # Invariants
//! - Missing file sections fall back to defaults field by field.
//! - Environment overrides win over file values.
//! - `lookup.timeout_secs` is always greater than zero.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_STORE_PATH: &str = "NOTEBOOK_STORE_PATH";
pub const ENV_LOG_LEVEL: &str = "NOTEBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTEBOOK_LOG_DIR";
pub const ENV_LOOKUP_URL: &str = "NOTEBOOK_LOOKUP_URL";
pub const ENV_LOOKUP_TIMEOUT_SECS: &str = "NOTEBOOK_LOOKUP_TIMEOUT_SECS";

const DEFAULT_STORE_FILE_NAME: &str = "notes.json";
const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_PAGE_URL_BASE: &str = "https://en.wikipedia.org/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    /// Backing file for the note tree.
    pub store_path: PathBuf,
    pub lookup: LookupConfig,
    pub log: LogConfig,
}

/// External lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// MediaWiki `api.php` endpoint.
    pub api_url: String,
    /// Base for `?curid=` reference URLs.
    pub page_url_base: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Logging settings; file logging is off unless `dir` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE_NAME),
            lookup: LookupConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_url_base: DEFAULT_PAGE_URL_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("notebook/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl NotebookConfig {
    /// Loads defaults, then `path` (when given), then environment overrides.
    ///
    /// # Errors
    /// - Returns an error when the file cannot be read or parsed.
    /// - Returns an error when an override or merged value is invalid.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses one TOML file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Applies `NOTEBOOK_*` overrides read through `lookup_var`.
    ///
    /// Blank values are ignored.
    pub fn apply_overrides(
        &mut self,
        lookup_var: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<()> {
        let read = |key: &str| {
            lookup_var(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read(ENV_STORE_PATH) {
            self.store_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            self.log.level = value;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            self.log.dir = Some(PathBuf::from(value));
        }
        if let Some(value) = read(ENV_LOOKUP_URL) {
            self.lookup.api_url = value;
        }
        if let Some(value) = read(ENV_LOOKUP_TIMEOUT_SECS) {
            let secs = value.parse::<u64>().map_err(|err| ConfigError::InvalidValue {
                key: ENV_LOOKUP_TIMEOUT_SECS,
                message: format!("`{value}` is not a whole number of seconds: {err}"),
            })?;
            self.lookup.timeout_secs = secs;
        }
        Ok(())
    }

    /// Checks merged values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "store_path",
                message: "cannot be empty".to_string(),
            });
        }
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "lookup.timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.lookup.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "lookup.api_url",
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
