//! Persisted 24-hour status distribution.

use std::collections::BTreeMap;
use std::sync::Arc;

use healthwatch_types::{hour_bucket, StatusCounts, RETENTION_HOURS};

use crate::storage::KeyValueStore;

const STORAGE_KEY: &str = "health_dist";

/// Hourly-bucketed counters of healthy/unhealthy/config outcomes over a
/// trailing 24-hour window.
///
/// Buckets are keyed by Unix-hour index. Multiple refreshes within the same
/// hour accumulate additively; buckets older than the retention window are
/// pruned on every write.
#[derive(Clone)]
pub struct DistributionStore {
    store: Arc<dyn KeyValueStore>,
}

impl DistributionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Add one refresh's classification counts into the bucket for `now_ms`,
    /// pruning expired buckets first.
    pub fn record(&self, counts: StatusCounts, now_ms: i64) {
        let bucket = hour_bucket(now_ms);
        let mut buckets = self.read();
        buckets.retain(|b, _| bucket - b <= RETENTION_HOURS);

        buckets.entry(bucket).or_default().add(counts);
        self.write(&buckets);
    }

    /// Drop buckets older than the retention window relative to `now_ms`.
    pub fn prune(&self, now_ms: i64) {
        let bucket = hour_bucket(now_ms);
        let mut buckets = self.read();
        let before = buckets.len();
        buckets.retain(|b, _| bucket - b <= RETENTION_HOURS);
        if buckets.len() != before {
            self.write(&buckets);
        }
    }

    /// All retained buckets, keyed by hour index.
    ///
    /// An unreadable stored value reads as empty.
    pub fn read(&self) -> BTreeMap<i64, StatusCounts> {
        let Some(json) = self.store.get(STORAGE_KEY) else {
            return BTreeMap::new();
        };
        // Stored object keys are strings (JSON objects cannot key by int)
        let parsed: BTreeMap<String, StatusCounts> =
            serde_json::from_str(&json).unwrap_or_default();
        parsed
            .into_iter()
            .filter_map(|(k, v)| k.parse::<i64>().ok().map(|b| (b, v)))
            .collect()
    }

    /// Sum of all retained buckets, for an at-a-glance distribution view.
    pub fn totals(&self) -> StatusCounts {
        let mut total = StatusCounts::default();
        for counts in self.read().values() {
            total.add(*counts);
        }
        total
    }

    fn write(&self, buckets: &BTreeMap<i64, StatusCounts>) {
        let keyed: BTreeMap<String, &StatusCounts> =
            buckets.iter().map(|(b, c)| (b.to_string(), c)).collect();
        match serde_json::to_string(&keyed) {
            Ok(json) => self.store.set(STORAGE_KEY, &json),
            Err(err) => tracing::warn!(error = %err, "failed to encode status distribution"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const HOUR_MS: i64 = 3_600_000;

    fn store() -> DistributionStore {
        DistributionStore::new(Arc::new(MemoryStore::new()))
    }

    fn counts(healthy: u32, unhealthy: u32, config: u32) -> StatusCounts {
        StatusCounts { healthy, unhealthy, config }
    }

    #[test]
    fn read_empty_before_first_record() {
        assert!(store().read().is_empty());
    }

    #[test]
    fn record_creates_current_bucket() {
        let dist = store();
        let now = 100 * HOUR_MS + 1234;
        dist.record(counts(3, 1, 0), now);

        let buckets = dist.read();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[&100], counts(3, 1, 0));
    }

    #[test]
    fn same_hour_accumulates_additively() {
        let dist = store();
        let now = 100 * HOUR_MS;
        dist.record(counts(3, 0, 0), now);
        dist.record(counts(2, 1, 1), now + 15 * 60 * 1000);

        let buckets = dist.read();
        assert_eq!(buckets[&100], counts(5, 1, 1));
    }

    #[test]
    fn distinct_hours_get_distinct_buckets() {
        let dist = store();
        dist.record(counts(6, 0, 0), 100 * HOUR_MS);
        dist.record(counts(5, 1, 0), 101 * HOUR_MS);

        let buckets = dist.read();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&100].healthy, 6);
        assert_eq!(buckets[&101].healthy, 5);
    }

    #[test]
    fn record_prunes_buckets_older_than_retention() {
        let dist = store();
        dist.record(counts(1, 0, 0), 100 * HOUR_MS);
        dist.record(counts(1, 0, 0), 124 * HOUR_MS);
        // Bucket 100 is exactly 24 hours behind 124: still retained
        assert_eq!(dist.read().len(), 2);

        dist.record(counts(1, 0, 0), 125 * HOUR_MS);
        // Now 25 behind: pruned
        let buckets = dist.read();
        assert!(!buckets.contains_key(&100));
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn every_retained_bucket_is_within_retention_after_record() {
        let dist = store();
        for h in 90..130 {
            dist.record(counts(1, 0, 0), h * HOUR_MS);
        }
        let current = 129;
        for bucket in dist.read().keys() {
            assert!(current - bucket <= RETENTION_HOURS, "bucket {bucket} too old");
        }
    }

    #[test]
    fn prune_without_record_drops_expired() {
        let dist = store();
        dist.record(counts(2, 0, 0), 100 * HOUR_MS);
        dist.prune(200 * HOUR_MS);
        assert!(dist.read().is_empty());
    }

    #[test]
    fn totals_sum_all_buckets() {
        let dist = store();
        dist.record(counts(3, 1, 0), 100 * HOUR_MS);
        dist.record(counts(2, 0, 1), 101 * HOUR_MS);

        assert_eq!(dist.totals(), counts(5, 1, 1));
    }

    #[test]
    fn corrupt_stored_value_reads_as_empty() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(STORAGE_KEY, "nonsense");

        let dist = DistributionStore::new(backing);
        assert!(dist.read().is_empty());
    }
}
