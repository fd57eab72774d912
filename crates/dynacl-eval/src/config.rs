//! Provider configuration.
//!
//! Defaults match long-standing behavior: a 1000-entry static cache and
//! directory failures suppressed toward exclusion. Override via environment
//! variables or explicit construction.

use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_STATIC_CACHE_CAPACITY;

/// What to do when the directory fails while classifying a principal as
/// static or dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryFailurePolicy {
    /// Log, treat the principal as not dynamic, and continue the walk.
    #[default]
    FailClosed,
    /// Abort the whole evaluation with the directory error.
    Abort,
}

impl FromStr for DirectoryFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail-closed" => Ok(Self::FailClosed),
            "abort" => Ok(Self::Abort),
            other => Err(ConfigError::InvalidValue(
                DIRECTORY_FAILURE_POLICY_VAR.to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Environment variable overriding [`ProviderConfig::static_cache_capacity`].
pub const STATIC_CACHE_CAPACITY_VAR: &str = "DYNACL_STATIC_CACHE_CAPACITY";
/// Environment variable overriding [`ProviderConfig::directory_failure_policy`].
pub const DIRECTORY_FAILURE_POLICY_VAR: &str = "DYNACL_DIRECTORY_FAILURE_POLICY";

/// Configuration for a [`DynamicAclProvider`](crate::DynamicAclProvider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Maximum number of principals kept in the static cache.
    pub static_cache_capacity: NonZeroUsize,
    /// Handling of directory failures during dynamic classification.
    pub directory_failure_policy: DirectoryFailurePolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            static_cache_capacity: NonZeroUsize::new(DEFAULT_STATIC_CACHE_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
            directory_failure_policy: DirectoryFailurePolicy::default(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DYNACL_STATIC_CACHE_CAPACITY` (default: 1000, must be > 0)
    /// - `DYNACL_DIRECTORY_FAILURE_POLICY` (`fail-closed` | `abort`, default: `fail-closed`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(STATIC_CACHE_CAPACITY_VAR) {
            config.static_cache_capacity = raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| ConfigError::InvalidValue(STATIC_CACHE_CAPACITY_VAR.to_string(), raw))?;
        }
        if let Some(raw) = lookup(DIRECTORY_FAILURE_POLICY_VAR) {
            config.directory_failure_policy = raw.trim().parse()?;
        }

        Ok(config)
    }

    pub fn with_static_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.static_cache_capacity = capacity;
        self
    }

    pub fn with_directory_failure_policy(mut self, policy: DirectoryFailurePolicy) -> Self {
        self.directory_failure_policy = policy;
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}
