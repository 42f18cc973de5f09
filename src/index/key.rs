//! Canonical IPv4 network keys.

use ipnet::{Ipv4Net, Ipv6Net};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::{Error, Result};

/// Maximum IPv4 prefix length.
pub const MAX_PREFIX_LEN: u8 = 32;

/// Network mask for a prefix length.
#[inline]
pub(crate) fn mask(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        u32::MAX << (MAX_PREFIX_LEN - prefix_len)
    }
}

/// A CIDR block identified by its masked base address and prefix length.
///
/// Host bits are always cleared, so `192.0.2.9/24` and `192.0.2.0/24`
/// produce the same key.
///
/// # Examples
/// ```
/// use iptags::index::NetworkKey;
/// use std::net::Ipv4Addr;
///
/// let key: NetworkKey = "192.0.2.9/24".parse().unwrap();
/// assert_eq!(key.network(), Ipv4Addr::new(192, 0, 2, 0));
/// assert!(key.contains(Ipv4Addr::new(192, 0, 2, 200)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkKey {
    base: u32,
    prefix_len: u8,
}

impl NetworkKey {
    /// Create a key from an address and prefix length.
    ///
    /// Returns `None` if `prefix_len` is greater than 32.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Option<Self> {
        if prefix_len > MAX_PREFIX_LEN {
            return None;
        }
        Some(Self::from_bits(u32::from(addr), prefix_len))
    }

    /// Key of the `prefix_len`-bit block containing `bits`.
    #[inline]
    pub(crate) fn from_bits(bits: u32, prefix_len: u8) -> Self {
        Self {
            base: bits & mask(prefix_len),
            prefix_len,
        }
    }

    /// The network (base) address.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base)
    }

    /// The prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Check if an address falls inside this block.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & mask(self.prefix_len) == self.base
    }

    /// Check if `other` is this block or a sub-block of it.
    pub fn contains_network(&self, other: &NetworkKey) -> bool {
        self.prefix_len <= other.prefix_len && other.base & mask(self.prefix_len) == self.base
    }

    #[inline]
    pub(crate) fn bits(&self) -> u32 {
        self.base
    }
}

impl From<Ipv4Net> for NetworkKey {
    fn from(net: Ipv4Net) -> Self {
        Self::from_bits(u32::from(net.addr()), net.prefix_len())
    }
}

impl fmt::Display for NetworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}

impl FromStr for NetworkKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(net) = s.parse::<Ipv4Net>() {
            return Ok(net.into());
        }

        if s.parse::<Ipv6Net>().is_ok() {
            return Err(Error::UnsupportedAddressFamily(s.to_string()));
        }

        Err(Error::InvalidCidrPattern(s.to_string()))
    }
}

/// Parse a dotted-quad IPv4 address.
pub fn parse_address(s: &str) -> Result<Ipv4Addr> {
    s.parse::<Ipv4Addr>()
        .map_err(|_| Error::InvalidIpAddress(s.to_string()))
}
