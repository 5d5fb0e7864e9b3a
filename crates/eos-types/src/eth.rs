//! Ethernet address as it appears in MAC table keys.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet address.
///
/// Accepts `00:00:11:11:22:22`, `00-00-11-11-22-22` and the switch CLI form
/// `0000.1111.2222`. Always prints the lower-case colon form, which is what
/// MAC table status keys are built from.
///
/// ```
/// use eos_types::EthAddr;
///
/// let addr: EthAddr = "0000.1111.2222".parse().unwrap();
/// assert_eq!(addr.to_string(), "00:00:11:11:22:22");
/// assert_eq!(addr, "00-00-11-11-22-22".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EthAddr([u8; 6]);

impl EthAddr {
    /// Address of the empty key that ends a MAC table cursor
    pub const ZERO: EthAddr = EthAddr([0; 6]);

    pub const fn new(octets: [u8; 6]) -> Self {
        EthAddr(octets)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Fills `octets` from `groups`, each group `width` bytes wide.
fn fill(groups: &[&str], width: usize, octets: &mut [u8; 6]) -> Option<()> {
    if groups.len() * width != octets.len() {
        return None;
    }
    for (chunk, group) in octets.chunks_mut(width).zip(groups) {
        if group.is_empty() || group.len() > width * 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(group, 16).ok()?;
        let be = value.to_be_bytes();
        chunk.copy_from_slice(&be[be.len() - width..]);
    }
    Some(())
}

impl FromStr for EthAddr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut octets = [0u8; 6];
        let parsed = match s.find([':', '-', '.']).map(|i| s.as_bytes()[i]) {
            Some(b'.') => fill(&s.split('.').collect::<Vec<_>>(), 2, &mut octets),
            Some(sep) => fill(&s.split(sep as char).collect::<Vec<_>>(), 1, &mut octets),
            None => None,
        };
        parsed
            .map(|()| EthAddr(octets))
            .ok_or_else(|| ParseError::InvalidEthAddr(s.to_string()))
    }
}

impl fmt::Display for EthAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl TryFrom<String> for EthAddr {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EthAddr> for String {
    fn from(addr: EthAddr) -> String {
        addr.to_string()
    }
}
