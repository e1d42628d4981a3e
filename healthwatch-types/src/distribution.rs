//! Status classification and hourly distribution counters.

use crate::{HealthMap, HealthResult};

/// Number of trailing hour buckets retained in the distribution.
pub const RETENTION_HOURS: i64 = 24;

/// Milliseconds per hour bucket.
const BUCKET_MS: i64 = 3_600_000;

/// Hour-bucket index for a Unix-millisecond timestamp.
pub fn hour_bucket(unix_ms: i64) -> i64 {
    unix_ms.div_euclid(BUCKET_MS)
}

/// The bucket a service outcome is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Healthy,
    Unhealthy,
    Config,
}

/// Substrings (matched case-insensitively) that mark a configuration error.
const CONFIG_MARKERS: [&str; 4] = ["config", "credential", "permission", "key"];

/// Classify one service outcome for the status distribution.
///
/// The config check wins over unhealthy, so an outcome lands in at most one
/// class. Services reporting `status == "unknown"` without `ok` are counted
/// nowhere - deliberately preserved behavior, not an accident of
/// implementation; revisit only as a product decision.
pub fn classify(result: &HealthResult) -> Option<StatusClass> {
    if let Some(error) = &result.error {
        let lower = error.to_lowercase();
        if CONFIG_MARKERS.iter().any(|m| lower.contains(m)) {
            return Some(StatusClass::Config);
        }
    }
    if result.ok {
        return Some(StatusClass::Healthy);
    }
    if result.status != crate::STATUS_UNKNOWN {
        return Some(StatusClass::Unhealthy);
    }
    None
}

/// Counters for one hour bucket of the status distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StatusCounts {
    #[serde(default)]
    pub healthy: u32,
    #[serde(default)]
    pub unhealthy: u32,
    #[serde(default)]
    pub config: u32,
}

impl StatusCounts {
    /// Tally one classified outcome.
    pub fn tally(&mut self, class: StatusClass) {
        match class {
            StatusClass::Healthy => self.healthy += 1,
            StatusClass::Unhealthy => self.unhealthy += 1,
            StatusClass::Config => self.config += 1,
        }
    }

    /// Add another set of counters into this one.
    pub fn add(&mut self, other: StatusCounts) {
        self.healthy += other.healthy;
        self.unhealthy += other.unhealthy;
        self.config += other.config;
    }

    /// Classify every entry of a refresh result and fold the counts.
    pub fn count(map: &HealthMap) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for result in map.values() {
            if let Some(class) = classify(result) {
                counts.tally(class);
            }
        }
        counts
    }

    /// Total outcomes counted across all three classes.
    pub fn total(&self) -> u32 {
        self.healthy + self.unhealthy + self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HealthMap, HealthResult, ServiceKey};

    #[test]
    fn healthy_result_classifies_healthy() {
        let r = HealthResult::from_status("healthy");
        assert_eq!(classify(&r), Some(StatusClass::Healthy));
    }

    #[test]
    fn down_result_classifies_unhealthy() {
        let r = HealthResult::down("upstream 503");
        assert_eq!(classify(&r), Some(StatusClass::Unhealthy));
    }

    #[test]
    fn config_marker_wins_over_unhealthy() {
        let r = HealthResult::down("Invalid API key");
        assert_eq!(classify(&r), Some(StatusClass::Config));
    }

    #[test]
    fn config_marker_wins_regardless_of_ok() {
        // The error text rule applies even to an ok result
        let mut r = HealthResult::from_status("healthy");
        r.error = Some("permission denied on fallback path".to_string());
        assert_eq!(classify(&r), Some(StatusClass::Config));
    }

    #[test]
    fn config_markers_match_case_insensitively() {
        for text in ["CONFIG missing", "bad Credential", "Permission denied", "expired KEY"] {
            let r = HealthResult::down(text);
            assert_eq!(classify(&r), Some(StatusClass::Config), "marker in {text:?}");
        }
    }

    #[test]
    fn unknown_without_ok_counts_nowhere() {
        let r = HealthResult::unreachable();
        // "endpoint not available" has no config marker and status is
        // "unknown", so the outcome is excluded from all three classes.
        assert_eq!(classify(&r), None);
    }

    #[test]
    fn classification_is_exclusive() {
        // One outcome, exactly one class, for every shape we produce
        let samples = [
            HealthResult::from_status("healthy"),
            HealthResult::down("plain failure"),
            HealthResult::down("credential rejected"),
        ];
        for r in samples {
            let mut counts = StatusCounts::default();
            if let Some(class) = classify(&r) {
                counts.tally(class);
            }
            assert!(counts.total() <= 1);
        }
    }

    #[test]
    fn count_folds_whole_map() {
        let mut map = HealthMap::new();
        map.insert(ServiceKey::Api, HealthResult::from_status("healthy"));
        map.insert(ServiceKey::Redis, HealthResult::from_status("ok"));
        map.insert(ServiceKey::Database, HealthResult::down("timeout"));
        map.insert(ServiceKey::OpenAi, HealthResult::down("Invalid API key"));
        map.insert(ServiceKey::Pinecone, HealthResult::unreachable());

        let counts = StatusCounts::count(&map);
        assert_eq!(counts.healthy, 2);
        assert_eq!(counts.unhealthy, 1);
        assert_eq!(counts.config, 1);
        // The unreachable entry is not counted
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn add_accumulates() {
        let mut a = StatusCounts { healthy: 3, unhealthy: 1, config: 0 };
        a.add(StatusCounts { healthy: 2, unhealthy: 0, config: 1 });
        assert_eq!(a, StatusCounts { healthy: 5, unhealthy: 1, config: 1 });
    }

    #[test]
    fn hour_bucket_floors_to_the_hour() {
        assert_eq!(hour_bucket(0), 0);
        assert_eq!(hour_bucket(3_599_999), 0);
        assert_eq!(hour_bucket(3_600_000), 1);
        // 2024-01-01T00:30:00Z
        assert_eq!(hour_bucket(1_704_067_200_000 + 30 * 60 * 1000), 473_352);
    }

    #[test]
    fn counts_serde_tolerates_missing_fields() {
        let parsed: StatusCounts = serde_json::from_str(r#"{"healthy": 4}"#).unwrap();
        assert_eq!(parsed, StatusCounts { healthy: 4, unhealthy: 0, config: 0 });
    }
}
