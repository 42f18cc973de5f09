//! Prefix index over tagged IPv4 networks.
//!
//! The index is built once by [`PrefixIndexBuilder`] and is immutable
//! afterwards. Every registered network is a node that knows its tags and
//! its immediate containing network (its parent), so a lookup finds the
//! longest matching prefix and then follows parent links:
//!
//! ```text
//! 10.20.30.41
//!     |
//!     v   longest match
//! 10.20.0.0/16 {bar} --parent--> 10.0.0.0/8 {delta} --parent--> (none)
//! ```
//!
//! # Examples
//! ```
//! use iptags::index::PrefixIndex;
//! use std::net::Ipv4Addr;
//!
//! let mut builder = PrefixIndex::builder();
//! builder.insert("foo", "192.0.2.0/24".parse().unwrap());
//! builder.insert("bar", "192.0.2.8/29".parse().unwrap());
//! let index = builder.build();
//!
//! assert_eq!(index.tags_for(Ipv4Addr::new(192, 0, 2, 9)), vec!["bar", "foo"]);
//! assert!(index.tags_for(Ipv4Addr::new(10, 0, 0, 1)).is_empty());
//! ```

mod builder;
mod key;


pub use builder::PrefixIndexBuilder;
pub use key::{parse_address, NetworkKey, MAX_PREFIX_LEN};

use ahash::AHashMap;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::net::Ipv4Addr;
use std::path::Path;

use crate::rule_entry::RuleEntry;
use crate::{knowledge_base, Result};

/// Interned tag identifier.
pub(crate) type TagId = u32;

/// A registered network.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: NetworkKey,
    /// Sorted, deduplicated tag ids
    pub(crate) tags: Box<[TagId]>,
    /// Immediate containing node
    pub(crate) parent: Option<usize>,
}

/// Immutable index of tagged IPv4 networks.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    pub(crate) nodes: Vec<Node>,
    pub(crate) by_key: AHashMap<NetworkKey, usize>,
    /// Interned tag strings, indexed by `TagId`
    pub(crate) tags: Vec<Box<str>>,
    /// Bit `n` is set when some registered network has prefix length `n`
    pub(crate) prefix_lens: u64,
}

impl PrefixIndex {
    /// Create a builder.
    pub fn builder() -> PrefixIndexBuilder {
        PrefixIndexBuilder::new()
    }

    /// Build an index from rule entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RuleEntry>,
    {
        let mut builder = PrefixIndexBuilder::new();
        builder.extend(entries);
        builder.build()
    }

    /// Load a knowledge base file (plain or gzip JSON) and build an index.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_entries(knowledge_base::load(path)?))
    }

    /// Parse a JSON knowledge base from a reader and build an index.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::from_entries(knowledge_base::from_reader(reader)?))
    }

    /// Number of registered networks.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no networks are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct tags.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Look up an exact network.
    pub fn get(&self, key: &NetworkKey) -> Option<Network<'_>> {
        self.by_key.get(key).map(|&id| self.network(id))
    }

    /// Most specific registered network containing `addr`.
    pub fn longest_match(&self, addr: Ipv4Addr) -> Option<Network<'_>> {
        probe(&self.by_key, u32::from(addr), self.prefix_lens).map(|id| self.network(id))
    }

    /// All registered networks containing `addr`, most specific first.
    pub fn ancestors(&self, addr: Ipv4Addr) -> Ancestors<'_> {
        Ancestors {
            index: self,
            next: probe(&self.by_key, u32::from(addr), self.prefix_lens),
        }
    }

    /// Sorted, duplicate-free tags of every network containing `addr`.
    ///
    /// Tags are ordered by code point. An address outside every network
    /// yields an empty vector.
    pub fn tags_for(&self, addr: Ipv4Addr) -> Vec<String> {
        let mut tags = BTreeSet::new();
        for network in self.ancestors(addr) {
            tags.extend(network.tags());
        }
        tags.into_iter().map(str::to_owned).collect()
    }

    /// Iterate over all registered networks in insertion order.
    pub fn networks(&self) -> impl Iterator<Item = Network<'_>> {
        (0..self.nodes.len()).map(move |id| self.network(id))
    }

    fn network(&self, id: usize) -> Network<'_> {
        Network {
            index: self,
            node: &self.nodes[id],
        }
    }
}

/// Find the longest registered prefix of `bits`, trying only the prefix
/// lengths set in `lens`.
pub(crate) fn probe(
    by_key: &AHashMap<NetworkKey, usize>,
    bits: u32,
    mut lens: u64,
) -> Option<usize> {
    while lens != 0 {
        let len = (u64::BITS - 1 - lens.leading_zeros()) as u8;
        lens &= !(1u64 << len);
        if let Some(&id) = by_key.get(&NetworkKey::from_bits(bits, len)) {
            return Some(id);
        }
    }
    None
}

/// A registered network borrowed from a [`PrefixIndex`].
#[derive(Clone, Copy)]
pub struct Network<'a> {
    index: &'a PrefixIndex,
    node: &'a Node,
}

impl<'a> Network<'a> {
    /// The network key.
    pub fn key(&self) -> NetworkKey {
        self.node.key
    }

    /// Tags assigned to exactly this network, in code point order.
    pub fn tags(&self) -> impl Iterator<Item = &'a str> + 'a {
        let index = self.index;
        let node = self.node;
        node.tags.iter().map(move |&id| &*index.tags[id as usize])
    }

    /// Immediate containing network, if any.
    pub fn parent(&self) -> Option<Network<'a>> {
        let index = self.index;
        self.node.parent.map(|id| index.network(id))
    }
}

impl fmt::Debug for Network<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("key", &self.key())
            .field("tags", &self.tags().collect::<Vec<_>>())
            .finish()
    }
}

/// Iterator over the networks containing an address, most specific first.
#[derive(Clone)]
pub struct Ancestors<'a> {
    index: &'a PrefixIndex,
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = Network<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let network = index.network(self.next?);
        self.next = network.node.parent;
        Some(network)
    }
}
