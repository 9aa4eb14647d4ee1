//! Pool configuration
//!
//! Describes what a pool manager preloads at construction and which keys are
//! recycled automatically after a fixed lifetime.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Name given to the top-level container that holds every pool group
pub const DEFAULT_ROOT_NAME: &str = "Pooled Instances";

/// One preload registration: warm `count` instances of `key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadEntry {
    /// Template key to load
    pub key: String,
    /// Number of instances to materialize once the template is loaded
    pub count: usize,
}

impl PreloadEntry {
    /// Create a preload entry
    pub fn new(key: impl Into<String>, count: usize) -> Self {
        Self { key: key.into(), count }
    }
}

/// Return in-use instances of `key` to their pool after `lifetime_secs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoReturnEntry {
    /// Template key whose instances are recycled automatically
    pub key: String,
    /// Seconds an instance stays in use before it is returned
    pub lifetime_secs: f32,
}

/// Configuration for a pool manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Name of the pool root container node
    pub root_name: String,
    /// Keys registered for preloading when the manager is created
    pub preload: Vec<PreloadEntry>,
    /// Keys recycled by the lifetime auto-return system
    pub auto_return: Vec<AutoReturnEntry>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            preload: Vec::new(),
            auto_return: Vec::new(),
        }
    }
}

impl Config for PoolConfig {}

impl PoolConfig {
    /// Builder-style preload registration
    #[must_use]
    pub fn with_preload(mut self, key: impl Into<String>, count: usize) -> Self {
        self.preload.push(PreloadEntry::new(key, count));
        self
    }

    /// Builder-style auto-return registration
    #[must_use]
    pub fn with_auto_return(mut self, key: impl Into<String>, lifetime_secs: f32) -> Self {
        self.auto_return.push(AutoReturnEntry {
            key: key.into(),
            lifetime_secs,
        });
        self
    }

    /// Check the configuration for values the pool cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(entry) = self.preload.iter().find(|entry| entry.key.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "preload entry with count {} has an empty key",
                entry.count
            )));
        }

        for entry in &self.auto_return {
            if entry.key.is_empty() {
                return Err(ConfigError::Invalid("auto-return entry has an empty key".to_string()));
            }
            if !entry.lifetime_secs.is_finite() || entry.lifetime_secs <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "auto-return lifetime for '{}' must be positive, got {}",
                    entry.key, entry.lifetime_secs
                )));
            }
        }

        Ok(())
    }
}
