//! Interface identifier.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle naming a physical or logical port, e.g. `Ethernet1` or
/// `Port-Channel10`.
///
/// The name is kept verbatim; the only constraint is that it is non-empty
/// and contains no whitespace or commas (commas separate interfaces in the
/// string form of a [`crate::MacEntry`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IntfId(String);

impl IntfId {
    /// Creates an interface id, validating the name.
    pub fn new(name: impl Into<String>) -> Result<Self, ParseError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == ',') {
            return Err(ParseError::InvalidIntfId(name));
        }
        Ok(IntfId(name))
    }

    /// Returns the interface name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for Ethernet interfaces.
    pub fn is_ethernet(&self) -> bool {
        self.0.starts_with("Ethernet")
    }

    /// Returns true for port-channel (LAG) interfaces.
    pub fn is_port_channel(&self) -> bool {
        self.0.starts_with("Port-Channel")
    }
}

impl fmt::Display for IntfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IntfId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntfId::new(s)
    }
}

impl TryFrom<String> for IntfId {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        IntfId::new(s)
    }
}

impl From<IntfId> for String {
    fn from(intf: IntfId) -> String {
        intf.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        let eth = IntfId::new("Ethernet1").unwrap();
        assert!(eth.is_ethernet());
        assert!(!eth.is_port_channel());
        assert_eq!(eth.to_string(), "Ethernet1");

        let lag: IntfId = "Port-Channel10".parse().unwrap();
        assert!(lag.is_port_channel());
    }

    #[test]
    fn test_invalid_names() {
        assert!(IntfId::new("").is_err());
        assert!(IntfId::new("Ethernet 1").is_err());
        assert!(IntfId::new("Ethernet1,Ethernet2").is_err());
    }

    #[test]
    fn test_ordering_is_by_name() {
        let a = IntfId::new("Ethernet1").unwrap();
        let b = IntfId::new("Ethernet2").unwrap();
        assert!(a < b);
    }
}
