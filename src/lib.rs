//! iptags - Tag IPv4 addresses by every CIDR network that contains them.
//!
//! This crate builds an immutable prefix index from a knowledge base of
//! `(tag, network)` rules and answers, for any IPv4 address, which tags
//! apply to it. Unlike a routing table lookup, every containing network
//! contributes, not only the most specific one.
//!
//! # Features
//!
//! - **Nested networks**: tags from all containing networks are merged
//! - **Deterministic output**: tags are deduplicated and sorted by code point
//! - **Build once, read many**: the index is immutable and `Send + Sync`
//! - **Hot reload**: [`IndexHandle`] swaps in a rebuilt index atomically
//! - **Gzip knowledge bases**: `.json` and `.json.gz` files load the same way
//! - **HTTP API**: JSON and HTML endpoints built on axum
//!
//! # Quick Start
//!
//! ```
//! use iptags::PrefixIndex;
//! use std::net::Ipv4Addr;
//!
//! let kb = br#"[
//!     {"tag": "foo", "ip_network": "192.0.2.0/24"},
//!     {"tag": "bar", "ip_network": "10.20.0.0/16"},
//!     {"tag": "SPAM", "ip_network": "10.20.30.40/32"}
//! ]"#;
//!
//! let index = PrefixIndex::from_reader(&kb[..]).unwrap();
//!
//! assert_eq!(index.tags_for(Ipv4Addr::new(10, 20, 30, 40)), vec!["SPAM", "bar"]);
//! assert_eq!(index.tags_for(Ipv4Addr::new(10, 20, 30, 41)), vec!["bar"]);
//! assert!(index.tags_for(Ipv4Addr::new(255, 255, 255, 255)).is_empty());
//! ```
//!
//! # Serving
//!
//! ```ignore
//! use iptags::{server, ServerConfig};
//!
//! let config = ServerConfig::default().with_knowledge_base("bigdata.json");
//! server::run(config).await?;
//! ```

mod config;
mod error;
mod handle;
mod rule_entry;

pub mod index;
pub mod knowledge_base;
pub mod report;
pub mod server;

// Re-export core types
pub use error::{Error, Result};
pub use index::{parse_address, NetworkKey, PrefixIndex, PrefixIndexBuilder};
pub use rule_entry::RuleEntry;

// Re-export serving types
pub use config::{ServerConfig, DEFAULT_KNOWLEDGE_BASE, DEFAULT_LISTEN};
pub use handle::IndexHandle;
