//! # healthwatch-types
//!
//! Core types for service health monitoring. This crate defines the common
//! schema that probes, the aggregation SDK, and consumers share: the fixed
//! set of monitored services, the normalized per-service result, and the
//! derived status-distribution counters.
//!
//! ## Design Goals
//!
//! - **One result shape**: backends report health inconsistently; every
//!   probe normalizes into [`HealthResult`] so downstream code never probes
//!   ad hoc field names
//! - **Wholesale replacement**: a refresh produces a complete [`HealthMap`];
//!   readers never observe a mix of two refresh cycles
//! - **Derived, not stored**: statistics over latency samples and
//!   distribution counts are computed by readers at display time
//!
//! ## Example
//!
//! ```rust
//! use healthwatch_types::{classify, HealthMap, HealthResult, ServiceKey, StatusClass};
//!
//! let mut map = HealthMap::new();
//! map.insert(ServiceKey::Api, HealthResult::from_status("healthy"));
//! map.insert(ServiceKey::Redis, HealthResult::down("Invalid API key"));
//!
//! assert_eq!(classify(&map[&ServiceKey::Api]), Some(StatusClass::Healthy));
//! // The config rule wins over plain unhealthy
//! assert_eq!(classify(&map[&ServiceKey::Redis]), Some(StatusClass::Config));
//! ```

mod distribution;
mod result;
mod service;
mod snapshot;

pub use distribution::*;
pub use result::*;
pub use service::*;
pub use snapshot::*;
