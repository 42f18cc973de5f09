//! Error types for iptags.

use thiserror::Error;

/// Error type for iptags operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Knowledge base is not valid JSON, or a record failed validation
    #[error("knowledge base parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid CIDR pattern
    #[error("invalid CIDR pattern: {0}")]
    InvalidCidrPattern(String),

    /// CIDR pattern for an address family other than IPv4
    #[error("unsupported address family (only IPv4 is supported): {0}")]
    UnsupportedAddressFamily(String),

    /// Rule record without a tag
    #[error("empty tag for network {network}")]
    EmptyTag { network: String },

    /// Invalid IP address
    #[error("invalid IP address: {0}")]
    InvalidIpAddress(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for iptags operations.
pub type Result<T> = std::result::Result<T, Error>;
