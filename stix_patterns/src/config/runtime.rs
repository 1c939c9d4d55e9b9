//! Runtime options: environment defaults and TOML configuration files

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Errors raised while loading runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Options that change what the validator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// FOLLOWEDBY without a governing WITHIN is an error (true) or a warning (false)
    pub strict_qualifiers: bool,

    /// Report every literal and semantic error (true) or stop at the first (false)
    pub collect_all_errors: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            strict_qualifiers: true,
            collect_all_errors: true,
        }
    }
}

impl ValidatorOptions {
    /// Lenient qualifier policy, all errors collected
    pub fn lenient() -> Self {
        Self {
            strict_qualifiers: false,
            ..Self::default()
        }
    }

    /// Defaults overridden by `STIX_STRICT_QUALIFIERS` / `STIX_COLLECT_ALL_ERRORS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            strict_qualifiers: env::var(env_vars::STRICT_QUALIFIERS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.strict_qualifiers),
            collect_all_errors: env::var(env_vars::COLLECT_ALL_ERRORS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.collect_all_errors),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

/// Complete runtime configuration, loadable from TOML
///
/// ```toml
/// [validator]
/// strict_qualifiers = false
///
/// [logging]
/// min_log_level = "debug"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub validator: ValidatorOptions,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Validator
    pub const STRICT_QUALIFIERS: &str = "STIX_STRICT_QUALIFIERS";
    pub const COLLECT_ALL_ERRORS: &str = "STIX_COLLECT_ALL_ERRORS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "STIX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "STIX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "STIX_LOGGING_MIN_LEVEL";
}
