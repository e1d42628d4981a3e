//! Settings loading: config file + environment, overridden by CLI flags.

use std::path::Path;

use anyhow::Result;

/// Resolved configuration for a healthwatch run.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL.
    pub base_url: String,
    /// Bearer token for authenticated deep checks.
    pub token: Option<String>,
    /// Request thorough backend self-checks instead of shallow pings.
    pub deep: bool,
    /// Refresh cadence in seconds when watching.
    pub interval_secs: u64,
    /// Path of the persisted state file.
    pub state_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            token: None,
            deep: true,
            interval_secs: 30,
            state_path: "healthwatch-state.json".to_string(),
        }
    }
}

/// Load settings from an optional config file, then `HEALTHWATCH_*`
/// environment variables. Unset values fall back to defaults.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let cfg = builder
        .add_source(config::Environment::with_prefix("HEALTHWATCH").try_parsing(true))
        .build()?;
    Ok(cfg.try_deserialize()?)
}
