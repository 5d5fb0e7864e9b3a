//! Callback interfaces the controller drives.
//!
//! The controlling plane owns the run loop and invokes these callbacks one
//! at a time, in delivery order, never reentrantly. Every callback runs to
//! completion before the next one starts.

use crate::error::SdkResult;
use eos_types::{MacEntry, MacKey};

/// Lifecycle and configuration callbacks.
pub trait AgentHandler: Send {
    /// Returns the name of this agent (for logging).
    fn name(&self) -> &str;

    /// Called once the agent's state is synchronized with the device.
    fn on_initialized(&mut self) -> SdkResult<()> {
        Ok(())
    }

    /// Called when the agent is enabled or disabled via configuration.
    fn on_agent_enabled(&mut self, _enabled: bool) -> SdkResult<()> {
        Ok(())
    }

    /// Called when an option is added, changed or removed. A removed
    /// option arrives with an empty value.
    fn on_agent_option(&mut self, _key: &str, _value: &str) -> SdkResult<()> {
        Ok(())
    }
}

/// MAC table change callbacks, delivered once a watch is registered.
pub trait MacTableHandler: Send {
    /// Called when an entry is installed or changed.
    fn on_mac_entry_set(&mut self, _entry: &MacEntry) -> SdkResult<()> {
        Ok(())
    }

    /// Called when an entry is removed.
    fn on_mac_entry_del(&mut self, _key: &MacKey) -> SdkResult<()> {
        Ok(())
    }
}
