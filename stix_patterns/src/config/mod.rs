//! Configuration for the STIX pattern validator
//!
//! Security limits are compile-time constants and cannot be changed at
//! runtime. User preferences and validator options are runtime values that
//! default from environment variables and can be loaded from a TOML file.

pub mod constants;
pub mod runtime;

pub use runtime::{ConfigError, LoggingPreferences, RuntimeConfig, ValidatorOptions};
