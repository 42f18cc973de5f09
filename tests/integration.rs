//! Integration tests for knowledge base loading and tag resolution.

use flate2::write::GzEncoder;
use flate2::Compression;
use iptags::{knowledge_base, Error, IndexHandle, PrefixIndex};
use std::io::Write;
use std::net::Ipv4Addr;
use tempfile::NamedTempFile;

const KNOWLEDGE_BASE: &str = r#"[
    {"tag": "foo", "ip_network": "192.0.2.0/24"},
    {"tag": "foo", "ip_network": "192.0.2.0/24"},
    {"tag": "{$(<br>a-tag<br>)$}", "ip_network": "192.0.2.8/29"},
    {"tag": "bar", "ip_network": "10.20.0.0/16"},
    {"tag": "zażółć ♥", "ip_network": "192.0.2.8/29"},
    {"tag": "bak", "ip_network": "192.0.2.8/29"},
    {"tag": "baz", "ip_network": "192.0.2.16/28"},
    {"tag": "alpha", "ip_network": "203.0.113.0/24"},
    {"tag": "beta", "ip_network": "203.0.113.128/25"},
    {"tag": "gamma", "ip_network": "203.0.113.64/26"},
    {"tag": "delta", "ip_network": "10.0.0.0/8"},
    {"tag": "epsilon", "ip_network": "10.0.0.0/16"},
    {"tag": "zeta", "ip_network": "10.0.1.0/24"},
    {"tag": "eta", "ip_network": "10.0.1.128/25"},
    {"tag": "theta", "ip_network": "172.16.0.0/12"},
    {"tag": "iota", "ip_network": "172.16.10.0/24"},
    {"tag": "kappa", "ip_network": "192.168.0.0/16"},
    {"tag": "lambda", "ip_network": "192.168.1.0/24"},
    {"tag": "mu", "ip_network": "192.168.1.128/25"},
    {"tag": "SPAM", "ip_network": "10.20.30.40/32"},
    {"tag": "SPECIAL", "ip_network": "8.8.8.0/24"}
]"#;

const EXPECTED: &[(&str, &[&str])] = &[
    ("192.0.2.7", &["foo"]),
    ("192.0.2.9", &["bak", "foo", "zażółć ♥", "{$(<br>a-tag<br>)$}"]),
    ("192.0.2.17", &["baz", "foo"]),
    ("203.0.113.10", &["alpha"]),
    ("203.0.113.70", &["alpha", "gamma"]),
    ("203.0.113.150", &["alpha", "beta"]),
    ("203.0.113.255", &["alpha", "beta"]),
    ("10.20.30.40", &["SPAM", "bar", "delta"]),
    ("10.20.30.41", &["bar", "delta"]),
    ("10.120.30.40", &["delta"]),
    ("10.0.2.15", &["delta", "epsilon"]),
    ("10.0.1.150", &["delta", "epsilon", "eta", "zeta"]),
    ("172.16.10.100", &["iota", "theta"]),
    ("192.168.0.100", &["kappa"]),
    ("192.168.1.150", &["kappa", "lambda", "mu"]),
    ("8.8.8.8", &["SPECIAL"]),
    ("192.0.3.9", &[]),
    ("0.0.0.0", &[]),
    ("255.255.255.255", &[]),
];

fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

fn assert_expected(index: &PrefixIndex) {
    for (addr, expected) in EXPECTED {
        assert_eq!(index.tags_for(ip(addr)), *expected, "tags for {}", addr);
    }
}

#[test]
fn test_resolve_from_reader() {
    let index = PrefixIndex::from_reader(KNOWLEDGE_BASE.as_bytes()).unwrap();

    assert_eq!(index.len(), 18);
    assert_eq!(index.tag_count(), 20);
    assert_expected(&index);
}

#[test]
fn test_resolve_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(KNOWLEDGE_BASE.as_bytes()).unwrap();

    let index = PrefixIndex::load(file.path()).unwrap();
    assert_expected(&index);
}

#[test]
fn test_resolve_from_gzip_file() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(KNOWLEDGE_BASE.as_bytes()).unwrap();

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&encoder.finish().unwrap()).unwrap();

    let index = PrefixIndex::load(file.path()).unwrap();
    assert_expected(&index);
}

#[test]
fn test_reverse_order_knowledge_base() {
    let mut entries = knowledge_base::from_slice(KNOWLEDGE_BASE.as_bytes()).unwrap();
    entries.reverse();

    let index = PrefixIndex::from_entries(entries);
    assert_expected(&index);
}

#[test]
fn test_handle_serves_same_results() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(KNOWLEDGE_BASE.as_bytes()).unwrap();

    let handle = IndexHandle::from_path(file.path()).unwrap();
    for (addr, expected) in EXPECTED {
        assert_eq!(handle.tags_for(ip(addr)), *expected, "tags for {}", addr);
    }
}

#[test]
fn test_bad_record_rejects_whole_knowledge_base() {
    let data = r#"[
        {"tag": "foo", "ip_network": "192.0.2.0/24"},
        {"tag": "bar", "ip_network": "192.0.2.0/64"}
    ]"#;

    let err = PrefixIndex::from_reader(data.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::InvalidCidrPattern(ref p) if p == "192.0.2.0/64"));
}

#[test]
fn test_ancestor_chain() {
    let index = PrefixIndex::from_reader(KNOWLEDGE_BASE.as_bytes()).unwrap();

    let chain: Vec<(String, Vec<&str>)> = index
        .ancestors(ip("10.0.1.150"))
        .map(|n| (n.key().to_string(), n.tags().collect()))
        .collect();

    assert_eq!(
        chain,
        vec![
            ("10.0.1.128/25".to_string(), vec!["eta"]),
            ("10.0.1.0/24".to_string(), vec!["zeta"]),
            ("10.0.0.0/16".to_string(), vec!["epsilon"]),
            ("10.0.0.0/8".to_string(), vec!["delta"]),
        ]
    );
}
