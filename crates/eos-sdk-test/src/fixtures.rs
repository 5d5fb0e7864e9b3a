//! Test fixtures for common agent scenarios
//!
//! Provides the example MAC bindings and reusable event sequences.

use eos_sdk_common::{
    event_channel, AgentEvent, EventReceiver, EventSender, InMemoryAgentMgr, InMemoryMacTable,
};
use eos_types::{EthAddr, IntfId, MacEntry, MacKey, VlanId};
use std::sync::Arc;

/// Builds a key, panicking on malformed fixture input.
pub fn mac_key(vlan: u16, addr: &str) -> MacKey {
    let vlan = VlanId::new(vlan).unwrap_or_else(|e| panic!("bad fixture VLAN: {e}"));
    let addr: EthAddr = addr
        .parse()
        .unwrap_or_else(|e| panic!("bad fixture address: {e}"));
    MacKey::new(vlan, addr)
}

/// Builds a single-interface entry.
pub fn mac_entry(vlan: u16, addr: &str, intf: &str) -> MacEntry {
    let intf = IntfId::new(intf).unwrap_or_else(|e| panic!("bad fixture interface: {e}"));
    MacEntry::new(mac_key(vlan, addr), intf)
}

/// The example MAC bindings installed by a `set` request
pub mod example_fixtures {
    use super::*;

    /// First example key, (1, 0000.1111.2222).
    pub fn key_one() -> MacKey {
        mac_key(1, "0000.1111.2222")
    }

    /// Second example key, (1, 0000.1111.2221).
    pub fn key_two() -> MacKey {
        mac_key(1, "0000.1111.2221")
    }

    /// First example key bound to Ethernet1.
    pub fn entry_one() -> MacEntry {
        mac_entry(1, "0000.1111.2222", "Ethernet1")
    }

    /// Second example key bound to Ethernet1.
    pub fn entry_two() -> MacEntry {
        mac_entry(1, "0000.1111.2221", "Ethernet1")
    }

    /// Distinct entries present in the table after a `set`.
    pub fn installed_entries() -> Vec<MacEntry> {
        vec![entry_one(), entry_two()]
    }
}

/// Sequence of controller events to replay against an agent
#[derive(Debug, Clone, Default)]
pub struct EventScript {
    /// Events in delivery order
    pub events: Vec<AgentEvent>,
}

impl EventScript {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the initialization callback
    pub fn initialized(mut self) -> Self {
        self.events.push(AgentEvent::Initialized);
        self
    }

    /// Append an enable/disable callback
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.events.push(AgentEvent::AgentEnabled(enabled));
        self
    }

    /// Append an option callback
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.events.push(AgentEvent::option(key, value));
        self
    }

    /// Append an option removal
    pub fn option_removed(self, key: impl Into<String>) -> Self {
        self.option(key, "")
    }

    /// Append a MAC entry notification
    pub fn mac_set(mut self, entry: MacEntry) -> Self {
        self.events.push(AgentEvent::MacEntrySet(entry));
        self
    }

    /// Append a MAC removal notification
    pub fn mac_del(mut self, key: MacKey) -> Self {
        self.events.push(AgentEvent::MacEntryDel(key));
        self
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the script has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Queue every event on `sender`. Returns how many were accepted.
    pub fn send(self, sender: &EventSender) -> usize {
        self.events
            .into_iter()
            .take_while(|event| sender.send(event.clone()).is_ok())
            .count()
    }
}

/// In-memory managers wired to a controller event queue
pub struct TestBed {
    /// Agent manager
    pub agent_mgr: Arc<InMemoryAgentMgr>,
    /// MAC table, pushing watch notifications into the queue
    pub mac_table: Arc<InMemoryMacTable>,
    /// Sending half of the event queue
    pub sender: EventSender,
    /// Receiving half, to hand to an event loop
    pub receiver: Option<EventReceiver>,
}

impl TestBed {
    /// Create a test bed with no options and an empty table
    pub fn new() -> Self {
        Self::with_agent_mgr(InMemoryAgentMgr::new())
    }

    /// Create a test bed with preconfigured options
    pub fn with_options<K, V>(options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_agent_mgr(InMemoryAgentMgr::with_options(options))
    }

    fn with_agent_mgr(agent_mgr: InMemoryAgentMgr) -> Self {
        let (sender, receiver) = event_channel();
        Self {
            agent_mgr: Arc::new(agent_mgr),
            mac_table: Arc::new(InMemoryMacTable::with_notifier(sender.clone())),
            sender,
            receiver: Some(receiver),
        }
    }

    /// Queue a script of events
    pub fn play(&self, script: EventScript) -> usize {
        script.send(&self.sender)
    }

    /// Take the receiving half of the queue
    pub fn take_receiver(&mut self) -> EventReceiver {
        self.receiver
            .take()
            .unwrap_or_else(|| panic!("event receiver already taken"))
    }
}

impl Default for TestBed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_example_keys_differ_in_last_octet() {
        let one = example_fixtures::key_one();
        let two = example_fixtures::key_two();
        assert_ne!(one, two);
        assert_eq!(one.vlan_id(), two.vlan_id());
        assert_eq!(
            one.to_string(),
            "mac_key_t(vlan_id=1, eth_addr=00:00:11:11:22:22)"
        );
    }

    #[test]
    fn test_event_script() {
        let script = EventScript::new()
            .initialized()
            .option("name", "Alice")
            .option_removed("name")
            .enabled(false);

        assert_eq!(script.len(), 4);
        assert_eq!(script.events[2], AgentEvent::option("name", ""));
    }

    #[test]
    fn test_test_bed_play() {
        let mut bed = TestBed::with_options([("name", "Alice")]);
        let mut rx = bed.take_receiver();
        assert_eq!(bed.play(EventScript::new().initialized().enabled(true)), 2);

        assert_eq!(rx.try_recv().unwrap(), AgentEvent::Initialized);
        assert_eq!(rx.try_recv().unwrap(), AgentEvent::AgentEnabled(true));
    }
}
