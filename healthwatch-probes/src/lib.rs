//! # healthwatch-probes
//!
//! HTTP probes for backend health-check endpoints.
//!
//! This crate turns a backend's heterogeneous health responses into the
//! canonical `HealthResult` from `healthwatch-types`. Each monitored
//! service has its own endpoint and its own quirks (status under `status`
//! vs `ok`, deep-check query flags, auth requirements); the probes absorb
//! all of that so callers see one shape.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthwatch_probes::ProbeClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ProbeClient::builder()
//!         .base_url("http://127.0.0.1:8000")
//!         .build();
//!
//!     // One round trip for all services, when the backend supports it
//!     let map = client.summary(true).await;
//!     println!("summary answered for {} services", map.len());
//! }
//! ```

mod client;
pub mod error;
pub mod sanitize;

pub use client::{ProbeClient, ProbeClientBuilder};
pub use error::ProbeError;
pub use sanitize::sanitize;

// Re-export types for convenience
pub use healthwatch_types::{HealthMap, HealthResult, ServiceKey};
