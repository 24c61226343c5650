// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default nesting limit for propagation and traversal
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Error when loading or saving a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this type
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Guards applied while values propagate and traversals recurse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Fail with a cycle error when a pin (or, for traversals, a node) is
    /// re-entered while still on the call stack
    pub cycle_guard: bool,
    /// Maximum nesting of flow hops or traversal recursion, enforced only
    /// when `cycle_guard` is off
    pub max_depth: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cycle_guard: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GraphConfig {
    /// Parse a configuration from a RON string
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: GraphConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!(?path, ?config, "loaded graph config");
        Ok(config)
    }

    /// Save the configuration as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}
