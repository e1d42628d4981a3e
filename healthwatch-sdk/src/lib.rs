//! # healthwatch-sdk
//!
//! The aggregation engine behind healthwatch.
//!
//! This crate orchestrates refresh cycles over the probes and maintains the
//! derived state a consumer renders: rolling per-service latency windows, a
//! 24-hour status distribution, and a last-known-good snapshot. All derived
//! state lives behind a pluggable key-value store so tests run against an
//! in-memory fake and production can persist anywhere.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use healthwatch_probes::ProbeClient;
//! use healthwatch_sdk::{FileStore, HealthMonitor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let probes = ProbeClient::builder()
//!         .base_url("http://127.0.0.1:8000")
//!         .build();
//!     let store = Arc::new(FileStore::open("healthwatch-state.json"));
//!     let monitor = HealthMonitor::new(probes, store);
//!
//!     // Show the last known state before the first live refresh
//!     if let Some(cached) = monitor.snapshot().load() {
//!         println!("last refresh at {}", cached.ts);
//!     }
//!
//!     let map = monitor.refresh(true).await;
//!     println!("{} services checked", map.len());
//! }
//! ```
//!
//! ## Features
//!
//! - **One writer**: the monitor is the sole writer of all three stores
//! - **Wholesale snapshots**: the cached map is replaced, never merged
//! - **Serialized refreshes**: overlapping refresh calls queue instead of
//!   racing their store writes
//! - **Best-effort persistence**: the stores are diagnostic state; write
//!   failures degrade charts, not correctness

mod distribution;
mod history;
mod monitor;
mod snapshot;
mod storage;

pub use distribution::DistributionStore;
pub use history::{LatencyStore, MAX_SAMPLES};
pub use monitor::HealthMonitor;
pub use snapshot::SnapshotCache;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

// Re-export types for convenience
pub use healthwatch_types::{
    classify, is_degraded, HealthMap, HealthResult, HealthSnapshot, ServiceKey, StatusClass,
    StatusCounts,
};
