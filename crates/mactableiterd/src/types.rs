//! Type definitions for mactableiterd

use crate::tables::{OPTION_CLEAR, OPTION_MAC, OPTION_NAME, OPTION_SET};
use std::fmt;

/// Lifecycle state of the agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentState {
    /// Waiting for the controller's initialization callback
    #[default]
    Uninitialized,
    /// Initialized and handling events
    Enabled,
    /// Disabled by configuration; no further work is done
    Disabled,
}

impl AgentState {
    /// Returns true once the agent has been disabled
    pub fn is_disabled(&self) -> bool {
        matches!(self, AgentState::Disabled)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentState::Uninitialized => "uninitialized",
            AgentState::Enabled => "enabled",
            AgentState::Disabled => "disabled",
        };
        write!(f, "{}", s)
    }
}

/// Options the agent reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    /// Name to greet
    Name,
    /// Enumerate the MAC table
    Mac,
    /// Install the example bindings
    Set,
    /// Remove every MAC entry
    Clear,
}

impl OptionKey {
    /// Maps an option key to a recognized option, if any
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            OPTION_NAME => Some(OptionKey::Name),
            OPTION_MAC => Some(OptionKey::Mac),
            OPTION_SET => Some(OptionKey::Set),
            OPTION_CLEAR => Some(OptionKey::Clear),
            _ => None,
        }
    }

    /// Returns the option key string
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::Name => OPTION_NAME,
            OptionKey::Mac => OPTION_MAC,
            OptionKey::Set => OPTION_SET,
            OptionKey::Clear => OPTION_CLEAR,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
