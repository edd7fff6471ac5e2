//! Core runtime configuration.
//!
//! # Responsibility
//! - Hold the immutable settings injected into services and bootstrap code.
//! - Load settings from `ADDDICT_*` environment variables.
//!
//! # Invariants
//! - `dictionaries_page_size` is never zero; it is at most `MAX_PAGE_SIZE`
//!   after validation.
//! - Loading never panics on malformed input.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(size) => size,
    None => unreachable!(),
};
pub const MAX_PAGE_SIZE: u32 = 100;

pub const ENV_PAGE_SIZE: &str = "ADDDICT_PAGE_SIZE";
pub const ENV_LOG_LEVEL: &str = "ADDDICT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ADDDICT_LOG_DIR";
pub const ENV_DB_PATH: &str = "ADDDICT_DB_PATH";

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but cannot be parsed.
    InvalidValue { key: &'static str, value: String },
    PageSizeOutOfRange(u32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
            Self::PageSizeOutOfRange(size) => write!(
                f,
                "dictionaries page size {size} is out of range 1..={MAX_PAGE_SIZE}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the dictionary core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Configured page size used for every paged listing.
    pub dictionaries_page_size: NonZeroU32,
    pub log_level: String,
    /// Absolute log directory. File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    /// SQLite database file.
    pub db_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            dictionaries_page_size: DEFAULT_PAGE_SIZE,
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = non_empty(lookup(ENV_PAGE_SIZE)) {
            let size = value
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_PAGE_SIZE,
                    value: value.clone(),
                })?;
            config.dictionaries_page_size =
                NonZeroU32::new(size).ok_or(ConfigError::PageSizeOutOfRange(size))?;
        }
        if let Some(value) = non_empty(lookup(ENV_LOG_LEVEL)) {
            config.log_level = value;
        }
        config.log_dir = non_empty(lookup(ENV_LOG_DIR)).map(PathBuf::from);
        config.db_path = non_empty(lookup(ENV_DB_PATH)).map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.dictionaries_page_size.get();
        if size > MAX_PAGE_SIZE {
            return Err(ConfigError::PageSizeOutOfRange(size));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
