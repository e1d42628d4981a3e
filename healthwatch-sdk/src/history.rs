//! Rolling latency history per monitored service.

use std::sync::Arc;

use healthwatch_types::ServiceKey;

use crate::storage::KeyValueStore;

/// Maximum number of latency samples kept per service.
pub const MAX_SAMPLES: usize = 10;

/// Per-service rolling window of probe round-trip times, most-recent-last.
///
/// Pure append-and-trim: no smoothing, no outlier rejection. Derived
/// statistics (latest, average, min, max) are computed by readers at
/// display time, not stored.
#[derive(Clone)]
pub struct LatencyStore {
    store: Arc<dyn KeyValueStore>,
}

impl LatencyStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn storage_key(service: ServiceKey) -> String {
        format!("health_latency_{}", service)
    }

    /// Append one sample in milliseconds, trimming to the newest
    /// [`MAX_SAMPLES`], and persist.
    pub fn record(&self, service: ServiceKey, millis: u64) {
        let mut samples = self.read(service);
        samples.push(millis);
        if samples.len() > MAX_SAMPLES {
            samples.drain(..samples.len() - MAX_SAMPLES);
        }
        match serde_json::to_string(&samples) {
            Ok(json) => self.store.set(&Self::storage_key(service), &json),
            Err(err) => tracing::warn!(%service, error = %err, "failed to encode latency samples"),
        }
    }

    /// Current samples for a service, oldest first; empty if none recorded.
    ///
    /// An unreadable stored value is treated as empty rather than an error.
    pub fn read(&self, service: ServiceKey) -> Vec<u64> {
        self.store
            .get(&Self::storage_key(service))
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }
}
