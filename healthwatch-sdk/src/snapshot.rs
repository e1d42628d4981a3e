//! Persisted last-known-good snapshot of aggregated health.

use std::sync::Arc;

use healthwatch_types::{HealthMap, HealthSnapshot};

use crate::storage::KeyValueStore;

const STORAGE_KEY: &str = "health_cache";

/// Cache of the most recent refresh result.
///
/// Overwritten wholesale on every successful refresh; loaded once at
/// startup so a consumer has data to show before its first live refresh
/// completes. There is no expiry - staleness is conveyed by the stored
/// timestamp.
#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<dyn KeyValueStore>,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite the cached snapshot.
    pub fn save(&self, data: &HealthMap, ts: &str) {
        let snapshot = HealthSnapshot::new(data.clone(), ts);
        match serde_json::to_string(&snapshot) {
            Ok(json) => self.store.set(STORAGE_KEY, &json),
            Err(err) => tracing::warn!(error = %err, "failed to encode snapshot"),
        }
    }

    /// The last-known snapshot, if one was ever saved and is readable.
    pub fn load(&self) -> Option<HealthSnapshot> {
        let json = self.store.get(STORAGE_KEY)?;
        serde_json::from_str(&json).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthwatch_types::{HealthResult, ServiceKey};

    fn cache() -> SnapshotCache {
        SnapshotCache::new(Arc::new(crate::storage::MemoryStore::new()))
    }

    #[test]
    fn load_empty_before_first_save() {
        assert!(cache().load().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let cache = cache();
        let mut map = HealthMap::new();
        map.insert(ServiceKey::Api, HealthResult::from_status("healthy"));
        map.insert(ServiceKey::Redis, HealthResult::down("timeout"));

        cache.save(&map, "2024-06-01T12:00:00Z");

        let snapshot = cache.load().unwrap();
        assert_eq!(snapshot.ts, "2024-06-01T12:00:00Z");
        assert_eq!(snapshot.data, map);
    }

    #[test]
    fn save_overwrites_not_merges() {
        let cache = cache();
        let mut first = HealthMap::new();
        first.insert(ServiceKey::Api, HealthResult::from_status("healthy"));
        first.insert(ServiceKey::Redis, HealthResult::from_status("healthy"));
        cache.save(&first, "2024-06-01T12:00:00Z");

        let mut second = HealthMap::new();
        second.insert(ServiceKey::Api, HealthResult::down("gone"));
        cache.save(&second, "2024-06-01T12:00:30Z");

        let snapshot = cache.load().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.data.contains_key(&ServiceKey::Redis));
        assert_eq!(snapshot.ts, "2024-06-01T12:00:30Z");
    }

    #[test]
    fn corrupt_stored_value_loads_as_none() {
        let backing = Arc::new(crate::storage::MemoryStore::new());
        backing.set(STORAGE_KEY, "{broken");

        let cache = SnapshotCache::new(backing);
        assert!(cache.load().is_none());
    }
}
