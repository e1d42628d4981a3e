//! Plain-text rendering and JSON export of refresh results.

use std::path::Path;

use anyhow::Result;

use healthwatch_sdk::{
    is_degraded, HealthMap, HealthMonitor, HealthResult, ServiceKey, StatusCounts,
};

/// Display state of a service card: ok, down, or unknown.
fn state_label(result: &HealthResult) -> &'static str {
    if result.ok {
        "ok"
    } else if result.status == "unknown" {
        "??"
    } else {
        "down"
    }
}

/// Statistics derived from the latency window at display time.
#[derive(Debug, PartialEq)]
struct LatencyStats {
    latest: u64,
    avg: u64,
    min: u64,
    max: u64,
    count: usize,
}

fn latency_stats(samples: &[u64]) -> Option<LatencyStats> {
    let latest = *samples.last()?;
    let sum: u64 = samples.iter().sum();
    Some(LatencyStats {
        latest,
        avg: sum / samples.len() as u64,
        min: *samples.iter().min()?,
        max: *samples.iter().max()?,
        count: samples.len(),
    })
}

/// Service-specific extras worth surfacing from the raw payload.
fn raw_badges(key: ServiceKey, result: &HealthResult) -> Vec<String> {
    let Some(raw) = &result.raw else {
        return Vec::new();
    };
    let mut badges = Vec::new();
    if key == ServiceKey::Pinecone {
        if let Some(exists) = raw.get("index_exists").and_then(|v| v.as_bool()) {
            badges.push(if exists { "index_exists" } else { "index_missing" }.to_string());
        }
    }
    if key == ServiceKey::Storage {
        if let Some(accessible) = raw.get("bucket_accessible").and_then(|v| v.as_bool()) {
            badges
                .push(if accessible { "bucket accessible" } else { "bucket error" }.to_string());
        }
    }
    badges
}

/// Print one line per monitored service.
pub fn print_map(map: &HealthMap, monitor: &HealthMonitor) {
    for key in ServiceKey::ALL {
        let Some(result) = map.get(&key) else {
            println!("  [ ?? ] {:<20} no result", key.title());
            continue;
        };

        let mut line = format!("  [{:^4}] {:<20} {}", state_label(result), key.title(), result.status);
        if let Some(version) = &result.version {
            line.push_str(&format!(" ({version})"));
        }
        for badge in raw_badges(key, result) {
            line.push_str(&format!(" [{badge}]"));
        }
        println!("{line}");

        if let Some(error) = &result.error {
            println!("         error: {error}");
        }
        if let Some(stats) = latency_stats(&monitor.latency().read(key)) {
            println!(
                "         latency: {}ms (avg {}ms, min {}ms, max {}ms, last {} checks)",
                stats.latest, stats.avg, stats.min, stats.max, stats.count
            );
        }
    }
}

/// Print a full report: banner, per-service lines, current counts, and the
/// 24-hour distribution.
pub fn print_report(map: &HealthMap, monitor: &HealthMonitor) {
    if is_degraded(map) {
        println!("!! One or more services are down or unavailable.");
        println!();
    }

    print_map(map, monitor);
    println!();

    let current = StatusCounts::count(map);
    println!(
        "  now: {} healthy / {} down / {} config",
        current.healthy, current.unhealthy, current.config
    );

    let day = monitor.distribution().totals();
    println!(
        "  last 24h: {} healthy / {} down / {} config",
        day.healthy, day.unhealthy, day.config
    );
}

/// Export the refresh result and derived stores as pretty JSON.
pub fn export_to_file(map: &HealthMap, monitor: &HealthMonitor, path: &Path) -> Result<()> {
    let current = StatusCounts::count(map);

    let mut latency = serde_json::Map::new();
    for key in ServiceKey::ALL {
        let samples = monitor.latency().read(key);
        if !samples.is_empty() {
            latency.insert(key.to_string(), serde_json::json!(samples));
        }
    }

    let distribution: serde_json::Map<String, serde_json::Value> = monitor
        .distribution()
        .read()
        .into_iter()
        .map(|(bucket, counts)| (bucket.to_string(), serde_json::json!(counts)))
        .collect();

    let export = serde_json::json!({
        "summary": {
            "healthy": current.healthy,
            "unhealthy": current.unhealthy,
            "config": current.config,
            "degraded": is_degraded(map),
        },
        "services": map,
        "latency": latency,
        "distribution": distribution,
    });

    std::fs::write(path, serde_json::to_string_pretty(&export)?)?;
    println!("Exported health state to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_label_distinguishes_down_from_unknown() {
        assert_eq!(state_label(&HealthResult::from_status("healthy")), "ok");
        assert_eq!(state_label(&HealthResult::down("boom")), "down");
        assert_eq!(state_label(&HealthResult::unreachable()), "??");
        // A non-ok, non-unknown status renders as down
        assert_eq!(state_label(&HealthResult::from_status("degraded")), "down");
    }

    #[test]
    fn latency_stats_over_samples() {
        let stats = latency_stats(&[10, 30, 20]).unwrap();
        assert_eq!(
            stats,
            LatencyStats { latest: 20, avg: 20, min: 10, max: 30, count: 3 }
        );
    }

    #[test]
    fn latency_stats_empty_is_none() {
        assert!(latency_stats(&[]).is_none());
    }

    #[test]
    fn badges_surface_pinecone_and_storage_extras() {
        let mut pinecone = HealthResult::from_status("healthy");
        pinecone.raw = Some(serde_json::json!({"index_exists": false}));
        assert_eq!(raw_badges(ServiceKey::Pinecone, &pinecone), vec!["index_missing"]);

        let mut storage = HealthResult::from_status("healthy");
        storage.raw = Some(serde_json::json!({"bucket_accessible": true}));
        assert_eq!(raw_badges(ServiceKey::Storage, &storage), vec!["bucket accessible"]);

        // Other services ignore those fields
        let mut api = HealthResult::from_status("healthy");
        api.raw = Some(serde_json::json!({"index_exists": true}));
        assert!(raw_badges(ServiceKey::Api, &api).is_empty());
    }
}
