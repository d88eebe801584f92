//! Weak-keyed wire memoization table.
//!
//! One table per wrapped definition, keyed by owner identity. Entries
//! hold the wire strongly and the owner weakly, so a wire lives exactly
//! as long as its owner remains reachable and the table never pins an
//! owner alive.
//!
//! Lookup treats an entry whose owner has died as absent. That also
//! covers address reuse: a new owner allocated at a dead owner's address
//! replaces the stale entry on its first store.
//!
//! The lazy create-and-store sequence around this table is deliberately
//! not atomic (lookup under a read lock, construction with no lock,
//! store under a write lock). Under concurrent first access the last
//! store wins; see `WireFactory::construct`.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wirerope_core::{OwnerKey, OwnerWeak};

/// Minimum table size before dead-entry sweeps kick in.
const SWEEP_FLOOR: usize = 8;

struct WireEntry<W> {
    owner: OwnerWeak,
    wire: Arc<W>,
}

/// Owner-keyed wire storage for one definition.
pub struct WireTable<W> {
    entries: RwLock<FxHashMap<OwnerKey, WireEntry<W>>>,
    /// Entry count at which the next opportunistic sweep runs.
    sweep_at: AtomicUsize,
}

impl<W> WireTable<W> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            sweep_at: AtomicUsize::new(SWEEP_FLOOR),
        }
    }

    /// Look up the canonical wire for an owner. Dead owners read as
    /// absent.
    pub fn get(&self, key: OwnerKey) -> Option<Arc<W>> {
        let entries = self.entries.read();
        let entry = entries.get(&key)?;
        if entry.owner.is_alive() {
            Some(entry.wire.clone())
        } else {
            None
        }
    }

    /// Store the wire for an owner. An existing entry is replaced: the
    /// last store wins under concurrent first access.
    pub fn insert(&self, key: OwnerKey, owner: OwnerWeak, wire: Arc<W>) {
        let mut entries = self.entries.write();
        entries.insert(key, WireEntry { owner, wire });
        if entries.len() >= self.sweep_at.load(Ordering::Relaxed) {
            entries.retain(|_, entry| entry.owner.is_alive());
            self.sweep_at
                .store(SWEEP_FLOOR.max(entries.len() * 2), Ordering::Relaxed);
        }
    }

    /// Drop all entries whose owner has died.
    pub fn sweep(&self) {
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.owner.is_alive());
    }

    /// Number of stored entries, dead or alive.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<W> Default for WireTable<W> {
    fn default() -> Self {
        Self::new()
    }
}
