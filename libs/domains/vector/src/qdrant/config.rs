use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};

const DEFAULT_URL: &str = "http://localhost:6334";
const DEFAULT_COLLECTION: &str = "faqs";

/// Qdrant connection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Shared collection holding every tenant's points
    pub collection: String,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: None,
            timeout_secs: 10,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let collection = env_or_default("QDRANT_COLLECTION", DEFAULT_COLLECTION);
        if collection.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "QDRANT_COLLECTION".to_string(),
                details: "collection name must not be blank".to_string(),
            });
        }

        Ok(Self {
            url: env_or_default("QDRANT_URL", DEFAULT_URL),
            api_key,
            timeout_secs: env_parse_or("QDRANT_TIMEOUT_SECS", 10)?,
            collection,
        })
    }
}
