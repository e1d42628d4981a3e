use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use healthwatch_probes::ProbeClient;
use healthwatch_sdk::{FileStore, HealthMonitor};

mod report;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "healthwatch")]
#[command(about = "Monitor backend service health via HTTP health-check endpoints")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g. http://127.0.0.1:8000)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Bearer token attached to authenticated deep checks
    #[arg(long)]
    token: Option<String>,

    /// Path to the persisted state file
    #[arg(long)]
    state: Option<String>,

    /// Use shallow liveness pings instead of deep backend self-checks
    #[arg(long)]
    shallow: bool,

    /// Keep refreshing on an interval instead of exiting after one cycle
    #[arg(short, long)]
    watch: bool,

    /// Refresh interval in seconds (used with --watch)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Run one refresh, export the full state to a JSON file, and exit
    #[arg(short, long, conflicts_with = "watch")]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut settings = settings::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(token) = args.token {
        settings.token = Some(token);
    }
    if let Some(state) = args.state {
        settings.state_path = state;
    }
    if let Some(interval) = args.interval {
        settings.interval_secs = interval;
    }
    if args.shallow {
        settings.deep = false;
    }

    let probes = ProbeClient::builder()
        .base_url(settings.base_url.clone())
        .maybe_bearer_token(settings.token.clone())
        .build();
    let store = Arc::new(FileStore::open(&settings.state_path));
    let monitor = HealthMonitor::new(probes, store);

    // Render the last known state before the first live refresh resolves
    if let Some(cached) = monitor.snapshot().load() {
        println!("Last known state (from {}):", cached.ts);
        report::print_map(&cached.data, &monitor);
        println!();
    }

    if let Some(export_path) = args.export {
        let map = monitor.refresh(settings.deep).await;
        return report::export_to_file(&map, &monitor, &export_path);
    }

    let map = monitor.refresh(settings.deep).await;
    report::print_report(&map, &monitor);

    if args.watch {
        let mut ticker = tokio::time::interval(Duration::from_secs(settings.interval_secs.max(1)));
        // The first tick fires immediately; the refresh above covered it
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let map = monitor.refresh(settings.deep).await;
            println!();
            report::print_report(&map, &monitor);
        }
    }

    Ok(())
}
