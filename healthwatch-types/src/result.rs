//! The canonical outcome of probing one service.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::ServiceKey;

/// Raw status label reported when a probe could not reach its endpoint.
pub const STATUS_UNKNOWN: &str = "unknown";

/// Raw status label reported when an endpoint answered with an error.
pub const STATUS_DOWN: &str = "down";

/// Error text attached when a probe's endpoint is not reachable at all.
pub const ERR_ENDPOINT_UNAVAILABLE: &str = "endpoint not available";

/// Outcome of probing one service.
///
/// Backends are inconsistent about how they report health, so probes
/// normalize everything into this shape. `ok` is derived from the raw
/// status label; the full payload is kept in `raw` so consumers can pull
/// out service-specific extras (e.g. `index_exists`, `bucket_accessible`).
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HealthResult {
    /// True iff the service self-reports healthy.
    pub ok: bool,

    /// Raw status label: "healthy", "down", "unknown", or backend-specific.
    pub status: String,

    /// ISO-8601 time the backend produced this result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Backend-reported version, opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Sanitized human-readable failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Full unprocessed backend payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

/// Aggregated result of one refresh cycle, one entry per monitored service.
///
/// Always replaced wholesale - readers never observe a mix of two cycles.
pub type HealthMap = BTreeMap<ServiceKey, HealthResult>;

/// Whether a raw status label counts as healthy.
///
/// Backends disagree: some report `"healthy"`, others `"ok"`, and some
/// stringify a boolean. All three exact tokens are treated as healthy.
pub fn is_healthy_token(status: &str) -> bool {
    matches!(status, "healthy" | "ok" | "true")
}

impl HealthResult {
    /// Build a result from a backend body's status label.
    ///
    /// `ok` is derived from the label via [`is_healthy_token`].
    pub fn from_status(status: impl Into<String>) -> Self {
        let status = status.into();
        Self {
            ok: is_healthy_token(&status),
            status,
            timestamp: None,
            version: None,
            error: None,
            raw: None,
        }
    }

    /// Build a "down" result for an endpoint that answered with an error.
    ///
    /// `error` must already be sanitized by the caller.
    pub fn down(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: STATUS_DOWN.to_string(),
            timestamp: None,
            version: None,
            error: Some(error.into()),
            raw: None,
        }
    }

    /// Build an "unknown" result for an endpoint that was not reachable.
    pub fn unreachable() -> Self {
        Self {
            ok: false,
            status: STATUS_UNKNOWN.to_string(),
            timestamp: None,
            version: None,
            error: Some(ERR_ENDPOINT_UNAVAILABLE.to_string()),
            raw: None,
        }
    }

    /// Attach the full backend payload.
    pub fn with_raw(mut self, raw: Option<Value>) -> Self {
        self.raw = raw;
        self
    }

    /// Whether this entry is down or unavailable.
    pub fn is_down(&self) -> bool {
        self.status == STATUS_DOWN || !self.ok
    }
}

/// True when any entry in the map is down or not ok.
///
/// Drives the degraded banner: one bad service flags the whole map without
/// hiding the healthy entries.
pub fn is_degraded(map: &HealthMap) -> bool {
    map.values().any(|r| r.is_down())
}
