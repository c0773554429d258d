//! Runtime configuration for the demo run.
//!
//! # Responsibility
//! - Resolve database path and logging options from the environment.
//! - Keep the CLI free of flags; every option has a default.
//!
//! # Invariants
//! - `db_path` is never empty.
//! - Unset or blank variables fall back to defaults.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "staffdb_demo.db";

pub const ENV_DB_PATH: &str = "STAFFDB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "STAFFDB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STAFFDB_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(name) => write!(f, "{name} is set but empty"),
        }
    }
}

impl Error for ConfigError {}

/// Options for one seed-and-report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Database file; deleted and recreated on every run.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. Stderr only when `None`.
    pub log_dir: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl DemoConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, applying defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_DB_PATH) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyValue(ENV_DB_PATH));
            }
            config.db_path = PathBuf::from(trimmed);
        }

        if let Some(value) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            config.log_level = value.trim().to_string();
        }

        config.log_dir = lookup(ENV_LOG_DIR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(config)
    }
}
