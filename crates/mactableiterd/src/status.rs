//! Status publication
//!
//! Status entries are the only surface an operator sees. Each write
//! overwrites the key and is visible as soon as the call returns.

use eos_sdk_common::{AgentMgr, SdkResult};
use eos_types::MacEntry;
use std::sync::Arc;
use tracing::debug;

use crate::tables::{greetings, status_keys};

/// Writes agent status through the agent manager
#[derive(Clone)]
pub struct StatusPublisher {
    agent_mgr: Arc<dyn AgentMgr>,
}

impl StatusPublisher {
    /// Creates a publisher on top of `agent_mgr`
    pub fn new(agent_mgr: Arc<dyn AgentMgr>) -> Self {
        Self { agent_mgr }
    }

    /// Publishes `value` under `key`, overwriting any previous value.
    ///
    /// Transport failures are returned as-is; there is no retry.
    pub fn set(&self, key: &str, value: &str) -> SdkResult<()> {
        debug!(key, value, "Publishing status");
        self.agent_mgr.status_set(key, value)
    }

    /// Publishes the greeting status
    pub fn greeting(&self, value: &str) -> SdkResult<()> {
        self.set(status_keys::GREETING, value)
    }

    /// Publishes the farewell shown when the agent is disabled
    pub fn farewell(&self) -> SdkResult<()> {
        self.greeting(greetings::ADIOS)
    }

    /// Publishes an entry under its key's canonical string
    pub fn entry(&self, entry: &MacEntry) -> SdkResult<()> {
        self.set(&entry.key().to_string(), &entry.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_sdk_common::InMemoryAgentMgr;
    use eos_types::{IntfId, MacKey};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_overwrites() {
        let mgr = Arc::new(InMemoryAgentMgr::new());
        let publisher = StatusPublisher::new(mgr.clone());

        publisher.greeting(greetings::PROMPT).unwrap();
        publisher.greeting(&greetings::hello("Alice")).unwrap();
        publisher.greeting(&greetings::hello("Alice")).unwrap();

        let status = mgr.status_snapshot();
        assert_eq!(status.len(), 1);
        assert_eq!(status["greeting"], "Hello Alice!");
    }

    #[test]
    fn test_entry_status_format() {
        let mgr = Arc::new(InMemoryAgentMgr::new());
        let publisher = StatusPublisher::new(mgr.clone());
        let entry = MacEntry::new(
            MacKey::parse("1", "0000.1111.2222").unwrap(),
            IntfId::new("Ethernet1").unwrap(),
        );

        publisher.entry(&entry).unwrap();

        assert_eq!(
            mgr.status("mac_key_t(vlan_id=1, eth_addr=00:00:11:11:22:22)")
                .unwrap()
                .as_deref(),
            Some("mac_entry_t(mac_key=mac_key_t(vlan_id=1, eth_addr=00:00:11:11:22:22), intfs='Ethernet1')")
        );
    }

    #[test]
    fn test_set_failure_is_returned() {
        let mgr = Arc::new(InMemoryAgentMgr::new());
        let publisher = StatusPublisher::new(mgr.clone());
        mgr.disconnect();
        assert!(publisher.farewell().unwrap_err().is_fatal());
    }
}
