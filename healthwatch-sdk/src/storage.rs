//! Pluggable key-value storage for the derived health stores.
//!
//! The latency history, status distribution, and snapshot cache are all
//! advisory diagnostic state: losing a write degrades nothing but a chart.
//! Storage is therefore a minimal string-keyed JSON-string store with
//! best-effort persistence, injected so the engine runs against an
//! in-memory fake in tests and any durable backend in production.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

/// A string-keyed store of JSON-encoded values.
///
/// Implementations must tolerate concurrent readers and writers from one
/// process; cross-process interleaving is accepted (the stores are not a
/// source of truth).
pub trait KeyValueStore: Send + Sync {
    /// Read the JSON string stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a JSON string under `key`, overwriting any previous value.
    ///
    /// Persistence failures are handled internally (logged, not returned).
    fn set(&self, key: &str, value: &str);
}

/// In-memory store for tests and embedders with their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }
}

/// File-backed store: one JSON object holding every key.
///
/// The file is loaded once at open and rewritten on every `set`. Write
/// failures are logged at `warn` and otherwise ignored.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading existing entries if the file exists.
    ///
    /// A missing or unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path).unwrap_or_default();
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn load(path: &Path) -> Option<HashMap<String, String>> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(entries) => Some(entries),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "state file unreadable, starting empty");
                None
            }
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let json = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode state");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist state");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }
}
