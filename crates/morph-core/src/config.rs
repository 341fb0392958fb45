//! Engine configuration

use crate::error::ConfigError;
use morph_adapter::ConflictStrategy;
use morph_graph::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Morph engine configuration
///
/// Every field is optional in TOML; missing fields take their defaults.
///
/// ```toml
/// path_cache_capacity = 500
/// conflict_strategy = "override"
/// default_adapters = false
/// detect_cycles = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MorphConfig {
    /// Maximum number of cached resolved paths (0 disables the cache)
    pub path_cache_capacity: u64,
    /// Registry behaviour on duplicate (source, target) registrations
    pub conflict_strategy: ConflictStrategy,
    /// Install the built-in primitive adapters
    pub default_adapters: bool,
    /// Fail adapters that re-enter themselves instead of recursing
    pub detect_cycles: bool,
}

impl MorphConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With path cache capacity
    #[inline]
    #[must_use]
    pub fn with_path_cache_capacity(mut self, capacity: u64) -> Self {
        self.path_cache_capacity = capacity;
        self
    }

    /// With conflict strategy
    #[inline]
    #[must_use]
    pub fn with_conflict_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.conflict_strategy = strategy;
        self
    }

    /// With or without built-in adapters
    #[inline]
    #[must_use]
    pub fn with_default_adapters(mut self, enabled: bool) -> Self {
        self.default_adapters = enabled;
        self
    }

    /// With or without re-entrancy detection
    #[inline]
    #[must_use]
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on invalid TOML or unknown fields.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`MorphConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            path_cache_capacity: DEFAULT_CACHE_CAPACITY,
            conflict_strategy: ConflictStrategy::Fail,
            default_adapters: true,
            detect_cycles: true,
        }
    }
}
