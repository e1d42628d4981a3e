//! Snapshot - the last-known aggregated health state.

use crate::HealthMap;

/// A persisted point-in-time view of all monitored services.
///
/// Overwritten wholesale on every successful refresh and read back once at
/// startup, so consumers can render a "last known" state before the first
/// live refresh resolves. Staleness is communicated by `ts`, not by expiry.
#[derive(Debug, Clone, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HealthSnapshot {
    /// One entry per monitored service, as produced by the refresh.
    pub data: HealthMap,

    /// ISO-8601 time the refresh completed.
    pub ts: String,
}

impl HealthSnapshot {
    /// Create a snapshot from a refresh result and its completion time.
    pub fn new(data: HealthMap, ts: impl Into<String>) -> Self {
        Self { data, ts: ts.into() }
    }

    /// Check if the snapshot holds no services.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of services in the snapshot.
    pub fn len(&self) -> usize {
        self.data.len()
    }
}
