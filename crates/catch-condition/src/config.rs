// crates/catch-condition/src/config.rs
// ============================================================================
// Module: Catcher Configuration
// Description: Configuration loading and validation for catchers.
// Purpose: Provide strict config parsing with hard limits.
// Dependencies: crate::scope, serde, toml, thiserror
// ============================================================================

//! ## Overview
//! A catcher is configured in code or from a small TOML file shared by a test
//! suite. Unknown keys and out-of-range values are rejected.
//!
//! ```toml
//! scope = "errors_and_panics"
//! max_cause_depth = 8
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::scope::ConditionScope;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of `source()` links recorded per captured condition.
pub const DEFAULT_MAX_CAUSE_DEPTH: usize = 16;
/// Largest accepted `max_cause_depth`.
pub const MAX_CAUSE_DEPTH_LIMIT: usize = 64;
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Catcher configuration.
///
/// # Invariants
/// - `max_cause_depth` is within `1..=MAX_CAUSE_DEPTH_LIMIT` once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatcherConfig {
    /// Failure channels to intercept.
    #[serde(default)]
    pub scope: ConditionScope,
    /// Number of `source()` links recorded per captured condition.
    #[serde(default = "default_max_cause_depth")]
    pub max_cause_depth: usize,
}

impl Default for CatcherConfig {
    fn default() -> Self {
        Self {
            scope: ConditionScope::default(),
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
        }
    }
}

impl CatcherConfig {
    /// Returns the default configuration with `scope` replaced.
    #[must_use]
    pub const fn with_scope(scope: ConditionScope) -> Self {
        Self {
            scope,
            max_cause_depth: DEFAULT_MAX_CAUSE_DEPTH,
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cause_depth == 0 {
            return Err(ConfigError::Invalid("max_cause_depth must be at least 1".to_string()));
        }
        if self.max_cause_depth > MAX_CAUSE_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_cause_depth must be at most {MAX_CAUSE_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde default for `max_cause_depth`.
const fn default_max_cause_depth() -> usize {
    DEFAULT_MAX_CAUSE_DEPTH
}
