//! Service identity - the fixed set of monitored dependencies.

use core::fmt;
use core::str::FromStr;

/// Identifier for a monitored backend dependency.
///
/// The set is fixed: every refresh cycle produces a result for each of
/// these, whether from the summary endpoint or an individual probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKey {
    /// The backend API itself (shallow liveness probe).
    Api,
    /// Pinecone vector database.
    Pinecone,
    /// OpenAI upstream.
    OpenAi,
    /// Redis cache.
    Redis,
    /// Relational database.
    Database,
    /// Object storage.
    Storage,
}

impl ServiceKey {
    /// All monitored services, in display order.
    pub const ALL: [ServiceKey; 6] = [
        ServiceKey::Api,
        ServiceKey::Pinecone,
        ServiceKey::OpenAi,
        ServiceKey::Redis,
        ServiceKey::Database,
        ServiceKey::Storage,
    ];

    /// The wire/storage identifier for this service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKey::Api => "api",
            ServiceKey::Pinecone => "pinecone",
            ServiceKey::OpenAi => "openai",
            ServiceKey::Redis => "redis",
            ServiceKey::Database => "database",
            ServiceKey::Storage => "storage",
        }
    }

    /// Human-readable title for display.
    pub fn title(&self) -> &'static str {
        match self {
            ServiceKey::Api => "API Service",
            ServiceKey::Pinecone => "Pinecone Vector DB",
            ServiceKey::OpenAi => "OpenAI Service",
            ServiceKey::Redis => "Redis Cache",
            ServiceKey::Database => "Database",
            ServiceKey::Storage => "Storage",
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized service name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownService(pub String);

impl fmt::Display for UnknownService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown service: {}", self.0)
    }
}

impl std::error::Error for UnknownService {}

impl FromStr for ServiceKey {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "api" => Ok(ServiceKey::Api),
            "pinecone" => Ok(ServiceKey::Pinecone),
            "openai" => Ok(ServiceKey::OpenAi),
            "redis" => Ok(ServiceKey::Redis),
            "database" => Ok(ServiceKey::Database),
            "storage" => Ok(ServiceKey::Storage),
            other => Err(UnknownService(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_service() {
        assert_eq!(ServiceKey::ALL.len(), 6);
        // Round-trip each through its string form
        for key in ServiceKey::ALL {
            assert_eq!(key.as_str().parse::<ServiceKey>().unwrap(), key);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "mongo".parse::<ServiceKey>().unwrap_err();
        assert_eq!(err, UnknownService("mongo".to_string()));
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ServiceKey::OpenAi.to_string(), "openai");
        assert_eq!(ServiceKey::Api.to_string(), "api");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ServiceKey::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
        let parsed: ServiceKey = serde_json::from_str("\"storage\"").unwrap();
        assert_eq!(parsed, ServiceKey::Storage);
    }

    #[test]
    fn ordering_is_stable_for_map_keys() {
        assert!(ServiceKey::Api < ServiceKey::Pinecone);
        assert!(ServiceKey::Database < ServiceKey::Storage);
    }
}
