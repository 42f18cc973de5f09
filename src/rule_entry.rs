//! Tagged network rule entries.

use ipnet::Ipv4Net;
use std::fmt;

use crate::index::NetworkKey;
use crate::{Error, Result};

/// A single `(tag, network)` rule.
///
/// The tag is guaranteed to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleEntry {
    tag: String,
    network: NetworkKey,
}

impl RuleEntry {
    /// Create a new rule entry.
    ///
    /// Fails with [`Error::EmptyTag`] if `tag` is empty.
    pub fn new(tag: impl Into<String>, network: NetworkKey) -> Result<Self> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(Error::EmptyTag {
                network: network.to_string(),
            });
        }
        Ok(Self { tag, network })
    }

    /// Create a rule entry from a tag and CIDR string such as `10.0.0.0/8`.
    pub fn parse(tag: impl Into<String>, cidr: &str) -> Result<Self> {
        Self::new(tag, cidr.parse::<NetworkKey>()?)
    }

    /// Create a rule entry from an `ipnet` network.
    pub fn from_net(tag: impl Into<String>, net: Ipv4Net) -> Result<Self> {
        Self::new(tag, net.into())
    }

    /// The tag assigned by this rule.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The network this rule applies to.
    pub fn network(&self) -> NetworkKey {
        self.network
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (String, NetworkKey) {
        (self.tag, self.network)
    }
}

impl fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.network, self.tag)
    }
}
