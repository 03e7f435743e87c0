//! # Root Cache
//!
//! Per-network TTL cache for authoritative tree snapshots. The slot is
//! replaced atomically under a single lock; writes are idempotent, so the
//! worst a racing pair of readers can do is one redundant refetch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use shroud_core::NetworkId;

use crate::types::MerkleRoot;

struct CachedRoot {
    root: MerkleRoot,
    fetched_at: Instant,
}

/// TTL cache of one `MerkleRoot` slot per network.
pub struct RootCache {
    ttl: Duration,
    slots: RwLock<HashMap<NetworkId, CachedRoot>>,
}

impl RootCache {
    /// A cache whose entries expire `ttl` after they were stored.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// The cached root for a network, if present and fresh.
    pub fn get(&self, network: &NetworkId) -> Option<MerkleRoot> {
        let slots = self.slots.read();
        let slot = slots.get(network)?;
        if slot.fetched_at.elapsed() >= self.ttl {
            tracing::debug!(%network, "cached root expired");
            return None;
        }
        Some(slot.root.clone())
    }

    /// Store a fresh snapshot, replacing the slot atomically.
    pub fn put(&self, root: MerkleRoot) {
        let network = root.network.clone();
        self.slots.write().insert(
            network,
            CachedRoot {
                root,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop a network's slot so the next read must refetch.
    pub fn clear(&self, network: &NetworkId) {
        self.slots.write().remove(network);
    }
}
