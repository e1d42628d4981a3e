//! HTTP probes against the backend's health-check endpoints.
//!
//! One probe per monitored service, each normalizing that endpoint's
//! response shape into the common `HealthResult`. Probes never return
//! errors: unreachable endpoints, HTTP error statuses, and malformed
//! bodies all fold into a result with `ok: false`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use healthwatch_probes::ProbeClient;
//! use healthwatch_types::ServiceKey;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ProbeClient::builder()
//!         .base_url("http://127.0.0.1:8000")
//!         .bearer_token("eyJ...")
//!         .build();
//!
//!     let result = client.probe(ServiceKey::Redis).await;
//!     println!("redis: {} (ok={})", result.status, result.ok);
//! }
//! ```

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde_json::Value;

use healthwatch_types::{is_healthy_token, HealthMap, HealthResult, ServiceKey};

use crate::sanitize::{sanitize, sanitize_value};
use crate::ProbeError;

/// Client for probing a backend's health-check endpoints.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ProbeClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ProbeClientBuilder {
        ProbeClientBuilder::default()
    }

    /// Probe one service and normalize its response.
    ///
    /// The `api` probe hits the unauthenticated liveness endpoint; the rest
    /// hit authenticated deep-check endpoints, attaching the bearer token
    /// when one is configured. An authorization failure comes back as a
    /// normal down result, not an error.
    pub async fn probe(&self, key: ServiceKey) -> HealthResult {
        match key {
            ServiceKey::Api => self.check("/health", &[], false).await,
            ServiceKey::Pinecone => self.check("/api/v1/health/pinecone", &[], true).await,
            ServiceKey::OpenAi => self.check("/api/v1/health/openai", &[], true).await,
            ServiceKey::Redis => {
                self.check("/api/v1/health/redis", &[("deep", "true")], true).await
            }
            ServiceKey::Database => {
                self.check("/api/v1/health/database", &[("deep", "true")], true).await
            }
            ServiceKey::Storage => {
                self.check("/api/v1/health/storage", &[("deep", "true")], true).await
            }
        }
    }

    /// Probe one service, measuring round-trip time in milliseconds.
    pub async fn probe_timed(&self, key: ServiceKey) -> (HealthResult, u64) {
        let start = Instant::now();
        let result = self.probe(key).await;
        (result, start.elapsed().as_millis() as u64)
    }

    /// Fetch the unified summary endpoint: all services in one round trip.
    ///
    /// Returns an empty map when the endpoint is unreachable, answers with
    /// an error status, or yields no recognizable entries - the caller
    /// falls back to other sources.
    pub async fn summary(&self, deep: bool) -> HealthMap {
        let deep = if deep { "true" } else { "false" };
        match self.get_json("/api/v1/health/summary", &[("deep", deep)], true).await {
            Ok((status, Some(body))) if status.is_success() => parse_summary(&body),
            Ok(_) => HealthMap::new(),
            Err(err) => {
                tracing::debug!(error = %err, "summary endpoint unavailable");
                HealthMap::new()
            }
        }
    }

    /// Fetch the legacy aggregate endpoint: `/health` plus any `services`
    /// sub-object it embeds.
    pub async fn aggregate(&self) -> HealthMap {
        match self.get_json("/health", &[], false).await {
            Ok((status, Some(body))) if status.is_success() => parse_aggregate(&body),
            Ok(_) => HealthMap::new(),
            Err(err) => {
                tracing::debug!(error = %err, "aggregate endpoint unavailable");
                HealthMap::new()
            }
        }
    }

    async fn check(&self, path: &str, query: &[(&str, &str)], auth: bool) -> HealthResult {
        match self.get_json(path, query, auth).await {
            Ok((status, body)) => normalize_response(status, body),
            Err(err) => {
                tracing::debug!(path, error = %err, "probe endpoint unavailable");
                HealthResult::unreachable()
            }
        }
    }

    /// Issue a GET and parse the body as JSON when the response declares a
    /// JSON content type. A non-JSON or malformed body is treated as absent.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        auth: bool,
    ) -> Result<(StatusCode, Option<Value>), ProbeError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if auth {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await?;
        let status = response.status();

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let body = if is_json { response.json::<Value>().await.ok() } else { None };

        Ok((status, body))
    }
}

/// Normalize a probe response into a `HealthResult`.
fn normalize_response(status: StatusCode, body: Option<Value>) -> HealthResult {
    if !status.is_success() {
        let error = body
            .as_ref()
            .and_then(|b| b.get("detail"))
            .map(sanitize_value)
            .unwrap_or_else(|| {
                sanitize(status.canonical_reason().unwrap_or("request failed"))
            });
        return HealthResult::down(error).with_raw(body);
    }

    match body {
        Some(body) => normalize_body(&body).with_raw(Some(body)),
        None => HealthResult::from_status("unknown"),
    }
}

/// Extract the status label from a body's `status` or `ok` field and build
/// a result carrying the body's timestamp and version.
fn normalize_body(body: &Value) -> HealthResult {
    let label = status_label(body);
    let mut result = HealthResult::from_status(label);
    result.timestamp = string_field(body, "timestamp");
    result.version = string_field(body, "version");
    result
}

/// The raw status label of a body: `status`, falling back to `ok`, falling
/// back to `"unknown"`. Non-string values are stringified the way the
/// backends' clients do (booleans become `"true"`/`"false"`).
fn status_label(body: &Value) -> String {
    let field = body.get("status").filter(|v| !v.is_null()).or_else(|| body.get("ok"));
    match field {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => "unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Parse the summary endpoint's body into per-service entries.
///
/// Entries live under a nested `services` object, or flat at the top level
/// keyed by service name alongside a top-level `status`.
fn parse_summary(body: &Value) -> HealthMap {
    let mut out = HealthMap::new();

    if let Some(services) = body.get("services").and_then(Value::as_object) {
        for (name, entry) in services {
            if let Ok(key) = name.parse::<ServiceKey>() {
                out.insert(key, normalize_body(entry).with_raw(Some(entry.clone())));
            }
        }
        return out;
    }

    for key in ServiceKey::ALL {
        if let Some(entry) = body.get(key.as_str()).filter(|v| v.is_object()) {
            out.insert(key, normalize_body(entry).with_raw(Some(entry.clone())));
        }
    }
    out
}

/// Parse the legacy `/health` body: the top-level status maps to the `api`
/// entry, and any embedded `services` object contributes the rest.
fn parse_aggregate(body: &Value) -> HealthMap {
    let mut out = HealthMap::new();

    let api_status = status_label(body);
    let api = HealthResult {
        ok: is_healthy_token(&api_status),
        status: api_status,
        timestamp: string_field(body, "timestamp"),
        version: string_field(body, "version"),
        error: None,
        raw: Some(body.clone()),
    };
    out.insert(ServiceKey::Api, api);

    if let Some(services) = body.get("services").and_then(Value::as_object) {
        for (name, entry) in services {
            if let Ok(key) = name.parse::<ServiceKey>() {
                out.insert(key, normalize_body(entry).with_raw(Some(entry.clone())));
            }
        }
    }
    out
}

/// Builder for `ProbeClient`.
#[derive(Debug, Default)]
pub struct ProbeClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl ProbeClientBuilder {
    /// Set the backend base URL (e.g., "http://127.0.0.1:8000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = Some(url);
        self
    }

    /// Set the bearer token attached to authenticated probes.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional bearer token; `None` leaves probes anonymous.
    pub fn maybe_bearer_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> ProbeClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        ProbeClient {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| "http://127.0.0.1:8000".to_string()),
            token: self.token,
        }
    }
}
