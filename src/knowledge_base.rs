//! Knowledge base loading.
//!
//! A knowledge base is a JSON array of rule records:
//!
//! ```json
//! [
//!     {"tag": "foo", "ip_network": "192.0.2.0/24"},
//!     {"tag": "bar", "ip_network": "192.0.2.8/29"}
//! ]
//! ```
//!
//! Files may be gzip-compressed. Every record is validated before any index
//! is built; a single bad record fails the whole load.

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::index::NetworkKey;
use crate::rule_entry::RuleEntry;
use crate::Result;

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Rule record as it appears in the knowledge base.
#[derive(Debug, Deserialize)]
struct RuleRecord {
    tag: String,
    ip_network: String,
}

impl RuleRecord {
    fn into_entry(self) -> Result<RuleEntry> {
        let network: NetworkKey = self.ip_network.parse()?;
        RuleEntry::new(self.tag, network)
    }
}

fn validate(records: Vec<RuleRecord>) -> Result<Vec<RuleEntry>> {
    records.into_iter().map(RuleRecord::into_entry).collect()
}

/// Parse a JSON knowledge base from a reader.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RuleEntry>> {
    let records: Vec<RuleRecord> = serde_json::from_reader(BufReader::new(reader))?;
    validate(records)
}

/// Parse a knowledge base from bytes, decompressing gzip input.
pub fn from_slice(data: &[u8]) -> Result<Vec<RuleEntry>> {
    if data.starts_with(&GZIP_MAGIC) {
        return from_reader(GzDecoder::new(data));
    }
    let records: Vec<RuleRecord> = serde_json::from_slice(data)?;
    validate(records)
}

/// Load a knowledge base file (plain or gzip JSON).
pub fn load(path: impl AsRef<Path>) -> Result<Vec<RuleEntry>> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let entries = from_slice(&data)?;
    log::info!("Loaded {} rule entries from {:?}", entries.len(), path);
    Ok(entries)
}
