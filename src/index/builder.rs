//! Prefix index construction.

use ahash::AHashMap;
use ipnet::Ipv4Net;
use std::collections::hash_map::Entry;

use super::{probe, NetworkKey, Node, PrefixIndex, TagId};
use crate::rule_entry::RuleEntry;

/// Network collected by the builder, before parent links exist.
#[derive(Debug)]
struct PendingNode {
    key: NetworkKey,
    tags: Vec<TagId>,
}

/// Collects tagged networks and builds an immutable [`PrefixIndex`].
///
/// Entries for the same network merge their tags. Parent links are only
/// computed in [`build`](Self::build), so the order in which networks are
/// inserted does not affect the resulting containment structure.
///
/// # Examples
/// ```
/// use iptags::index::PrefixIndexBuilder;
/// use std::net::Ipv4Addr;
///
/// let mut builder = PrefixIndexBuilder::new();
/// builder
///     .add_cidr("bar", "10.20.0.0/16".parse().unwrap())
///     .add_cidr("SPAM", "10.20.30.40/32".parse().unwrap());
///
/// let index = builder.build();
/// assert_eq!(index.tags_for(Ipv4Addr::new(10, 20, 30, 40)), vec!["SPAM", "bar"]);
/// ```
#[derive(Debug, Default)]
pub struct PrefixIndexBuilder {
    nodes: Vec<PendingNode>,
    by_key: AHashMap<NetworkKey, usize>,
    tag_ids: AHashMap<String, TagId>,
    /// Bit `n` is set when some network has prefix length `n`
    prefix_lens: u64,
    entry_count: usize,
}

impl PrefixIndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `tag` to `network`.
    pub fn insert(&mut self, tag: &str, network: NetworkKey) -> &mut Self {
        let tag_id = self.intern(tag);

        match self.by_key.entry(network) {
            Entry::Occupied(e) => self.nodes[*e.get()].tags.push(tag_id),
            Entry::Vacant(e) => {
                e.insert(self.nodes.len());
                self.nodes.push(PendingNode {
                    key: network,
                    tags: vec![tag_id],
                });
                self.prefix_lens |= 1u64 << network.prefix_len();
            }
        }

        self.entry_count += 1;
        self
    }

    /// Add a rule entry.
    pub fn add_entry(&mut self, entry: &RuleEntry) -> &mut Self {
        self.insert(entry.tag(), entry.network())
    }

    /// Assign `tag` to an `ipnet` network.
    pub fn add_cidr(&mut self, tag: &str, net: Ipv4Net) -> &mut Self {
        self.insert(tag, net.into())
    }

    /// Number of entries inserted so far.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Number of distinct networks inserted so far.
    pub fn network_count(&self) -> usize {
        self.nodes.len()
    }

    fn intern(&mut self, tag: &str) -> TagId {
        if let Some(&id) = self.tag_ids.get(tag) {
            return id;
        }
        let id = self.tag_ids.len() as TagId;
        self.tag_ids.insert(tag.to_owned(), id);
        id
    }

    /// Link every network to its immediate containing network and freeze
    /// the result.
    pub fn build(self) -> PrefixIndex {
        let mut tags: Vec<Box<str>> = vec![Box::default(); self.tag_ids.len()];
        for (tag, id) in self.tag_ids {
            tags[id as usize] = tag.into_boxed_str();
        }

        let nodes: Vec<Node> = self
            .nodes
            .into_iter()
            .map(|pending| {
                let mut node_tags = pending.tags;
                node_tags.sort_unstable_by(|a, b| tags[*a as usize].cmp(&tags[*b as usize]));
                node_tags.dedup();

                // Only strictly shorter prefixes can be a parent.
                let shorter = (1u64 << pending.key.prefix_len()) - 1;
                let parent = probe(&self.by_key, pending.key.bits(), self.prefix_lens & shorter);

                Node {
                    key: pending.key,
                    tags: node_tags.into_boxed_slice(),
                    parent,
                }
            })
            .collect();

        log::info!(
            "Built prefix index: {} entries, {} networks, {} distinct tags",
            self.entry_count,
            nodes.len(),
            tags.len()
        );

        PrefixIndex {
            nodes,
            by_key: self.by_key,
            tags,
            prefix_lens: self.prefix_lens,
        }
    }
}

impl Extend<RuleEntry> for PrefixIndexBuilder {
    fn extend<I: IntoIterator<Item = RuleEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.add_entry(&entry);
        }
    }
}

impl<'a> Extend<&'a RuleEntry> for PrefixIndexBuilder {
    fn extend<I: IntoIterator<Item = &'a RuleEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.add_entry(entry);
        }
    }
}
