//! TTL and capacity bounded bundle cache.
//!
//! Entries are keyed by canonical identifier and expire at lookup time.
//! Stored bundles are snapshots: a clone goes in on store and a clone
//! comes out on hit, so callers and the cache never alias each other.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::model::bundle::CharacterContext;

struct CacheEntry {
    bundle: CharacterContext,
    stored_at: Instant,
}

/// In-memory bundle cache with per-entry TTL and oldest-entry eviction.
pub struct ContextCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl ContextCache {
    /// Create a cache holding at most `max_entries` bundles for `ttl` each.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Look up a fresh bundle, evicting it first if stale.
    pub fn get(&self, character_id: &str) -> Option<CharacterContext> {
        let mut entries = self.entries.lock();
        match entries.get(character_id) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                Some(entry.bundle.clone())
            }
            Some(_) => {
                entries.remove(character_id);
                debug!(character_id, "evicted stale cache entry");
                None
            }
            None => None,
        }
    }

    /// Store a snapshot of `bundle`, evicting the oldest entry when the
    /// capacity is exceeded.
    pub fn store(&self, character_id: &str, bundle: &CharacterContext) {
        let mut entries = self.entries.lock();
        entries.insert(
            character_id.to_string(),
            CacheEntry {
                bundle: bundle.clone(),
                stored_at: Instant::now(),
            },
        );

        if entries.len() > self.max_entries {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(id, _)| id.clone())
            {
                entries.remove(&oldest);
                debug!(character_id = %oldest, "evicted oldest cache entry over capacity");
            }
        }
    }

    /// Number of currently stored entries, stale or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
