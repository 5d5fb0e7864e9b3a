//! Value types shared by EOS SDK agents.
//!
//! This crate provides type-safe representations of the forwarding-table
//! primitives an agent exchanges with the device management plane:
//!
//! - [`EthAddr`]: 48-bit Ethernet address
//! - [`VlanId`]: IEEE 802.1Q VLAN identifier
//! - [`IntfId`]: interface handle (`Ethernet1`, `Port-Channel10`, ...)
//! - [`MacKey`]: VLAN + address, the key of a MAC table entry
//! - [`MacEntry`]: a MAC table entry and the interfaces it forwards to
//!
//! String forms are canonical: two values are equal if and only if their
//! `to_string()` output is equal.

mod eth;
mod intf;
mod mac_table;
mod vlan;

pub use eth::EthAddr;
pub use intf::IntfId;
pub use mac_table::{MacEntry, MacKey};
pub use vlan::VlanId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid Ethernet address format: {0}")]
    InvalidEthAddr(String),

    #[error("invalid VLAN ID: {0} (0 and 4095 are reserved)")]
    InvalidVlanId(u16),

    #[error("invalid VLAN ID format: {0}")]
    InvalidVlanFormat(String),

    #[error("invalid interface name: {0:?}")]
    InvalidIntfId(String),
}
