//! Leaderboard cache: the single shared slot read by command handlers.
//!
//! One writer (the refresh loop) and many readers. The slot holds an
//! `Arc<LeaderboardSnapshot>`; `replace` swaps the pointer, so a reader holds
//! either the old snapshot in full or the new one in full. The lock only guards
//! the pointer copy and is never held across an await.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use aocboard_domain::{LeaderboardSnapshot, MemberRecord};
use chrono::{DateTime, Utc};
use tracing::debug;

type Slot = Option<Arc<LeaderboardSnapshot>>;

/// In-memory holder of the latest leaderboard snapshot.
pub struct LeaderboardCache {
    slot: RwLock<Slot>,
}

impl LeaderboardCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Make `snapshot` the visible state, discarding the previous one.
    ///
    /// Returns the shared handle now stored in the cache.
    pub fn replace(&self, snapshot: impl Into<Arc<LeaderboardSnapshot>>) -> Arc<LeaderboardSnapshot> {
        let snapshot = snapshot.into();

        let previous = std::mem::replace(&mut *self.write_slot(), Some(snapshot.clone()));

        debug!(
            members = snapshot.len(),
            replaced = previous.is_some(),
            "Leaderboard cache replaced"
        );

        // `previous` drops here, outside the lock; readers may still hold it.
        snapshot
    }

    /// The latest snapshot, or `None` before the first successful refresh.
    pub fn read(&self) -> Option<Arc<LeaderboardSnapshot>> {
        self.read_slot().clone()
    }

    /// The first `n` members of the current snapshot.
    ///
    /// Returns an empty list when nothing is cached and never more members than
    /// the snapshot has.
    pub fn top_n(&self, n: usize) -> Vec<MemberRecord> {
        self.read()
            .map(|snapshot| snapshot.top_n(n).to_vec())
            .unwrap_or_default()
    }

    /// Whether a snapshot has been cached.
    pub fn has_cache(&self) -> bool {
        self.read_slot().is_some()
    }

    /// Build time of the current snapshot.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.read_slot().as_ref().map(|s| s.last_updated())
    }

    // A writer panicking mid-swap cannot leave a torn value, so a poisoned
    // lock still holds a valid slot.
    fn read_slot(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Slot> {
        self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for LeaderboardCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use std::thread;

    fn snapshot_with(generation: u64, members: usize) -> LeaderboardSnapshot {
        let mut map = Map::new();
        for i in 0..members {
            map.insert(
                i.to_string(),
                json!({
                    "name": format!("member-{i}"),
                    "id": i,
                    "stars": 0,
                    "completion_day_level": {},
                    "local_score": generation,
                    "global_score": 0
                }),
            );
        }
        let raw: Value = json!({ "members": map, "owner_id": generation, "event": "2018" });
        LeaderboardSnapshot::from_json(&raw).unwrap()
    }

    #[test]
    fn test_empty_cache() {
        let cache = LeaderboardCache::new();

        assert!(cache.read().is_none());
        assert!(!cache.has_cache());
        assert!(cache.last_updated().is_none());
        assert!(cache.top_n(10).is_empty());
    }

    #[test]
    fn test_replace_then_read_returns_same_snapshot() {
        let cache = LeaderboardCache::new();
        let snapshot = snapshot_with(1, 3);
        let expected = snapshot.clone();

        let stored = cache.replace(snapshot);
        let read = cache.read().unwrap();

        assert!(Arc::ptr_eq(&stored, &read));
        assert_eq!(*read, expected);
        assert_eq!(cache.last_updated(), Some(expected.last_updated()));
        assert!(cache.has_cache());
    }

    #[test]
    fn test_replace_discards_previous() {
        let cache = LeaderboardCache::new();
        let old = cache.replace(snapshot_with(1, 2));

        cache.replace(snapshot_with(2, 5));

        let current = cache.read().unwrap();
        assert_eq!(current.owner_id(), 2);
        assert_eq!(current.len(), 5);
        // Readers holding the old handle keep an intact view
        assert_eq!(old.owner_id(), 1);
        assert_eq!(old.len(), 2);
    }

    #[test]
    fn test_top_n_returns_all_when_n_exceeds_len() {
        let cache = LeaderboardCache::new();
        cache.replace(snapshot_with(1, 10));

        assert_eq!(cache.top_n(15).len(), 10);
        assert_eq!(cache.top_n(3).len(), 3);
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_snapshot() {
        let cache = Arc::new(LeaderboardCache::new());
        cache.replace(snapshot_with(0, 8));

        let writer = {
            let cache = cache.clone();
            thread::spawn(move || {
                for generation in 1..=200u64 {
                    cache.replace(snapshot_with(generation, 8));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = cache.read().unwrap();
                        let generation = snapshot.owner_id();
                        assert_eq!(snapshot.len(), 8);
                        assert!(snapshot.members().iter().all(|m| m.local_score == generation));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(cache.read().unwrap().owner_id(), 200);
    }
}
