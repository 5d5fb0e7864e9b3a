//! VLAN half of a MAC table key.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// A VLAN a MAC table entry can live in: 1 through 4094.
///
/// ```
/// use eos_types::VlanId;
///
/// assert_eq!("Vlan10".parse::<VlanId>().unwrap().as_u16(), 10);
/// assert!(VlanId::new(4095).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanId(u16);

impl VlanId {
    /// Rejects the reserved IDs 0 and 4095.
    pub const fn new(id: u16) -> Result<Self, ParseError> {
        match id {
            1..=4094 => Ok(VlanId(id)),
            _ => Err(ParseError::InvalidVlanId(id)),
        }
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = ParseError;

    /// Parses `10` or an interface-style `Vlan10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .get(..4)
            .filter(|prefix| prefix.eq_ignore_ascii_case("vlan"))
            .map_or(s, |_| &s[4..]);
        let id = digits
            .parse()
            .map_err(|_| ParseError::InvalidVlanFormat(s.to_string()))?;
        VlanId::new(id)
    }
}
