//! The refresh orchestrator.

use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use futures_util::future::join_all;

use healthwatch_probes::ProbeClient;
use healthwatch_types::{HealthMap, ServiceKey, StatusCounts};

use crate::distribution::DistributionStore;
use crate::history::LatencyStore;
use crate::snapshot::SnapshotCache;
use crate::storage::KeyValueStore;

/// Orchestrates refresh cycles and owns the derived health stores.
///
/// A refresh prefers the backend's summary endpoint (one round trip for
/// every service), falls back to the legacy aggregate endpoint when the
/// summary yields nothing, and probes any remaining service individually
/// and concurrently. The merged map is persisted as the new snapshot, and
/// the latency and distribution stores are updated as side effects.
///
/// The monitor is the sole writer of the stores; consumers read them and
/// trigger refreshes.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use healthwatch_probes::ProbeClient;
/// use healthwatch_sdk::{HealthMonitor, MemoryStore};
///
/// #[tokio::main]
/// async fn main() {
///     let probes = ProbeClient::builder()
///         .base_url("http://127.0.0.1:8000")
///         .build();
///     let monitor = HealthMonitor::new(probes, Arc::new(MemoryStore::new()));
///
///     let map = monitor.refresh(true).await;
///     println!("{} services checked", map.len());
/// }
/// ```
pub struct HealthMonitor {
    probes: ProbeClient,
    latency: LatencyStore,
    distribution: DistributionStore,
    snapshot: SnapshotCache,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl HealthMonitor {
    /// Create a monitor over the given probes and storage backend.
    pub fn new(probes: ProbeClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            probes,
            latency: LatencyStore::new(store.clone()),
            distribution: DistributionStore::new(store.clone()),
            snapshot: SnapshotCache::new(store),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one refresh cycle and return the merged result map.
    ///
    /// Individual probe failures never abort the cycle - they produce
    /// `ok: false` entries. Each endpoint is attempted exactly once per
    /// cycle; scheduling repeated refreshes is the caller's job.
    ///
    /// Overlapping calls are serialized: a second caller waits for the
    /// in-flight cycle to finish before starting its own, so snapshot
    /// writes never race in-process.
    pub async fn refresh(&self, deep: bool) -> HealthMap {
        let _guard = self.refresh_gate.lock().await;

        let start = Instant::now();
        let summary = self.probes.summary(deep).await;
        let ms_summary = start.elapsed().as_millis() as u64;

        let initial = if summary.is_empty() {
            tracing::debug!("summary yielded no entries, trying aggregate endpoint");
            self.probes.aggregate().await
        } else {
            summary
        };
        let initial_keys: Vec<ServiceKey> = initial.keys().copied().collect();

        // Probe every service the summary/aggregate did not answer for,
        // concurrently, measuring each call on its own.
        let missing: Vec<ServiceKey> = ServiceKey::ALL
            .into_iter()
            .filter(|key| !initial.contains_key(key))
            .collect();
        let fetched = join_all(missing.iter().map(|&key| self.probes.probe_timed(key))).await;

        let mut combined = initial;
        for (key, (result, ms)) in missing.into_iter().zip(fetched) {
            self.latency.record(key, ms);
            combined.insert(key, result);
        }
        // The summary call's single round-trip time is attributed to every
        // service it answered for; those were not probed individually.
        for key in initial_keys {
            self.latency.record(key, ms_summary);
        }

        let now = Utc::now();
        let ts = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.snapshot.save(&combined, &ts);
        self.distribution
            .record(StatusCounts::count(&combined), now.timestamp_millis());

        tracing::debug!(
            services = combined.len(),
            summary_ms = ms_summary,
            "refresh complete"
        );
        combined
    }

    /// The rolling latency history store.
    pub fn latency(&self) -> &LatencyStore {
        &self.latency
    }

    /// The 24-hour status distribution store.
    pub fn distribution(&self) -> &DistributionStore {
        &self.distribution
    }

    /// The last-known-good snapshot cache.
    pub fn snapshot(&self) -> &SnapshotCache {
        &self.snapshot
    }
}
