//! MAC address table key and entry types.

use crate::{EthAddr, IntfId, ParseError, VlanId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Key of a MAC table entry: a VLAN and an Ethernet address.
///
/// The default key (VLAN 0, all-zero address) is the "empty" key. Table
/// cursors return it to signal the end of a traversal, so it never names a
/// real entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacKey {
    vlan_id: u16,
    eth_addr: EthAddr,
}

impl MacKey {
    /// Creates a key from a validated VLAN and an address.
    pub fn new(vlan: VlanId, eth_addr: EthAddr) -> Self {
        Self {
            vlan_id: vlan.as_u16(),
            eth_addr,
        }
    }

    /// Creates a key without validating the VLAN.
    ///
    /// Used for keys that come back from the table manager, which may carry
    /// VLAN values this agent would refuse to install.
    pub const fn from_raw(vlan_id: u16, eth_addr: EthAddr) -> Self {
        Self { vlan_id, eth_addr }
    }

    /// Parses a VLAN and an address in any accepted textual form.
    pub fn parse(vlan: &str, eth_addr: &str) -> Result<Self, ParseError> {
        Ok(Self::new(vlan.parse()?, eth_addr.parse()?))
    }

    /// Returns the VLAN identifier.
    pub const fn vlan_id(&self) -> u16 {
        self.vlan_id
    }

    /// Returns the Ethernet address.
    pub const fn eth_addr(&self) -> EthAddr {
        self.eth_addr
    }

    /// Returns true if neither the VLAN nor the address is set.
    pub fn is_empty(&self) -> bool {
        self.vlan_id == 0 && self.eth_addr.is_zero()
    }
}

impl fmt::Display for MacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mac_key_t(vlan_id={}, eth_addr={})",
            self.vlan_id, self.eth_addr
        )
    }
}

/// An entry of the MAC address table.
///
/// A unicast entry forwards to exactly one interface, a multicast entry may
/// list several, and an entry with no interface is a drop entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacEntry {
    key: MacKey,
    intfs: BTreeSet<IntfId>,
}

impl MacEntry {
    /// Creates a unicast entry.
    pub fn new(key: MacKey, intf: IntfId) -> Self {
        Self {
            key,
            intfs: BTreeSet::from([intf]),
        }
    }

    /// Creates an entry forwarding to a set of interfaces.
    pub fn with_intfs(key: MacKey, intfs: impl IntoIterator<Item = IntfId>) -> Self {
        Self {
            key,
            intfs: intfs.into_iter().collect(),
        }
    }

    /// Returns the key of this entry.
    pub const fn key(&self) -> &MacKey {
        &self.key
    }

    /// Returns every interface this entry forwards to, in name order.
    pub fn intfs(&self) -> &BTreeSet<IntfId> {
        &self.intfs
    }

    /// Returns the interface of a unicast entry, or the first interface of a
    /// multicast entry. `None` for a drop entry.
    pub fn intf(&self) -> Option<&IntfId> {
        self.intfs.iter().next()
    }

    /// Replaces the interfaces with a single one.
    pub fn set_intf(&mut self, intf: IntfId) {
        self.intfs = BTreeSet::from([intf]);
    }

    /// Adds an interface.
    pub fn add_intf(&mut self, intf: IntfId) {
        self.intfs.insert(intf);
    }

    /// Removes an interface.
    pub fn remove_intf(&mut self, intf: &IntfId) -> bool {
        self.intfs.remove(intf)
    }

    /// Returns true if this entry drops traffic.
    pub fn is_drop(&self) -> bool {
        self.intfs.is_empty()
    }

    /// Returns true if the key of this entry is empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Display for MacEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mac_entry_t(mac_key={}, intfs='", self.key)?;
        for (i, intf) in self.intfs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", intf)?;
        }
        f.write_str("')")
    }
}
