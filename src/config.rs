//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

/// Default knowledge base path.
pub const DEFAULT_KNOWLEDGE_BASE: &str = "bigdata.json";

/// Default listen address.
pub const DEFAULT_LISTEN: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8000));

/// Configuration for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Knowledge base the index is built from
    pub knowledge_base: PathBuf,
    /// Address to listen on
    pub listen: SocketAddr,
}

impl ServerConfig {
    /// Create a new ServerConfig.
    pub fn new(knowledge_base: impl Into<PathBuf>, listen: SocketAddr) -> Self {
        Self {
            knowledge_base: knowledge_base.into(),
            listen,
        }
    }

    /// Use a different knowledge base.
    pub fn with_knowledge_base(mut self, knowledge_base: impl Into<PathBuf>) -> Self {
        self.knowledge_base = knowledge_base.into();
        self
    }

    /// Use a different listen address.
    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_KNOWLEDGE_BASE, DEFAULT_LISTEN)
    }
}
