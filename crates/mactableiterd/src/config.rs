//! Agent configuration
//!
//! Loaded from a YAML file; every field is optional:
//!
//! ```yaml
//! tracer_name: MacTableIter
//! cursor_bridge: threaded
//! watch_all_mac_entries: true
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration defaults
pub mod defaults {
    use super::CursorBridgeMode;

    /// Tracer name attached to the agent's spans.
    pub const TRACER_NAME: &str = "MacTableIter";

    /// Cursor bridge used for table and option traversals.
    pub const CURSOR_BRIDGE: CursorBridgeMode = CursorBridgeMode::Inline;

    /// Whether to subscribe to every MAC entry at construction.
    pub const WATCH_ALL_MAC_ENTRIES: bool = true;
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Unknown cursor bridge '{0}' (expected 'inline' or 'threaded')")]
    UnknownCursorBridge(String),
}

/// How cursors are turned into iterators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorBridgeMode {
    /// Poll the cursor on the consuming thread
    #[default]
    Inline,
    /// Poll the cursor on a producer thread with a rendezvous handoff
    Threaded,
}

impl fmt::Display for CursorBridgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorBridgeMode::Inline => write!(f, "inline"),
            CursorBridgeMode::Threaded => write!(f, "threaded"),
        }
    }
}

impl FromStr for CursorBridgeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inline" => Ok(CursorBridgeMode::Inline),
            "threaded" => Ok(CursorBridgeMode::Threaded),
            _ => Err(ConfigError::UnknownCursorBridge(s.to_string())),
        }
    }
}

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Tracer name attached to the agent's spans
    pub tracer_name: String,
    /// Cursor bridge rendition
    pub cursor_bridge: CursorBridgeMode,
    /// Subscribe to every MAC entry at construction
    pub watch_all_mac_entries: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            tracer_name: defaults::TRACER_NAME.to_string(),
            cursor_bridge: defaults::CURSOR_BRIDGE,
            watch_all_mac_entries: defaults::WATCH_ALL_MAC_ENTRIES,
        }
    }
}

impl AgentConfig {
    /// Parses a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AgentConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Checks field values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracer_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tracer_name",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
