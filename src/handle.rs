//! Shared index handle with hot reload support.
//!
//! The index itself is immutable. Rebuilding means constructing a new
//! [`PrefixIndex`] and atomically swapping it in; queries that already hold
//! a snapshot finish against the old index.

use arc_swap::ArcSwap;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::index::PrefixIndex;
use crate::{Error, Result};

/// Owner of the current [`PrefixIndex`], shared by all request handlers.
///
/// # Example
///
/// ```ignore
/// use iptags::IndexHandle;
///
/// let handle = IndexHandle::from_path("bigdata.json")?;
/// let tags = handle.snapshot().tags_for("192.0.2.9".parse()?);
///
/// // Rebuild from the same file and swap it in
/// handle.reload()?;
/// ```
pub struct IndexHandle {
    /// The live index, wrapped in ArcSwap for atomic replacement.
    current: ArcSwap<PrefixIndex>,
    /// Knowledge base the index was loaded from, if any.
    source: Option<PathBuf>,
    /// Number of times the index has been replaced.
    generation: AtomicU64,
}

impl IndexHandle {
    /// Wrap an already built index.
    pub fn new(index: PrefixIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
            source: None,
            generation: AtomicU64::new(0),
        }
    }

    /// Load a knowledge base and remember its path for [`reload`](Self::reload).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let index = PrefixIndex::load(path)?;
        Ok(Self {
            current: ArcSwap::from_pointee(index),
            source: Some(path.to_path_buf()),
            generation: AtomicU64::new(0),
        })
    }

    /// Knowledge base path, if the handle was created from one.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Get the current index.
    pub fn snapshot(&self) -> Arc<PrefixIndex> {
        self.current.load_full()
    }

    /// Sorted, duplicate-free tags for `addr` from the current index.
    pub fn tags_for(&self, addr: Ipv4Addr) -> Vec<String> {
        self.current.load().tags_for(addr)
    }

    /// Number of times the index has been replaced.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Atomically replace the current index.
    pub fn replace(&self, index: PrefixIndex) {
        self.current.store(Arc::new(index));
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Rebuild the index from the source knowledge base and swap it in.
    ///
    /// On failure the current index keeps serving.
    pub fn reload(&self) -> Result<()> {
        let path = self
            .source
            .as_deref()
            .ok_or_else(|| Error::Config("index handle has no knowledge base path".to_string()))?;

        let index = PrefixIndex::load(path)?;
        self.replace(index);

        log::info!("Hot reloaded knowledge base from {:?}", path);
        Ok(())
    }
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle")
            .field("source", &self.source)
            .field("networks", &self.current.load().len())
            .field("generation", &self.generation())
            .finish()
    }
}
