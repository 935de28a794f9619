use core_config::{ConfigError, FromEnv, env_or_default, env_parse_optional, env_parse_or, env_required};

/// Bounds for the retrieval pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Over-fetch width of the similarity search
    pub candidate_limit: usize,
    /// Maximum entries handed to the prompt, on either path
    pub max_entries: usize,
    /// Candidates scoring below this are dropped with the other tenants' hits
    pub min_score: Option<f32>,
    /// Character budget of the context block
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 10,
            max_entries: 5,
            min_score: None,
            max_context_chars: 4000,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::Invalid {
                key: "RETRIEVAL_MAX_ENTRIES".to_string(),
                details: "must be at least 1".to_string(),
            });
        }
        if self.candidate_limit < self.max_entries {
            return Err(ConfigError::Invalid {
                key: "RETRIEVAL_CANDIDATE_LIMIT".to_string(),
                details: format!(
                    "must be >= RETRIEVAL_MAX_ENTRIES ({}), got {}",
                    self.max_entries, self.candidate_limit
                ),
            });
        }
        if self.max_context_chars == 0 {
            return Err(ConfigError::Invalid {
                key: "RETRIEVAL_MAX_CONTEXT_CHARS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl FromEnv for RetrievalConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            candidate_limit: env_parse_or("RETRIEVAL_CANDIDATE_LIMIT", defaults.candidate_limit)?,
            max_entries: env_parse_or("RETRIEVAL_MAX_ENTRIES", defaults.max_entries)?,
            min_score: env_parse_optional("RETRIEVAL_MIN_SCORE")?,
            max_context_chars: env_parse_or(
                "RETRIEVAL_MAX_CONTEXT_CHARS",
                defaults.max_context_chars,
            )?,
        };
        config.validate()?;
        Ok(config)
    }
}

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions settings for answer generation
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl ChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 512,
            timeout_secs: 30,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl FromEnv for ChatConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::new(env_required("OPENAI_API_KEY")?);
        let temperature: f32 = env_parse_or("CHAT_TEMPERATURE", defaults.temperature)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                key: "CHAT_TEMPERATURE".to_string(),
                details: format!("must be within 0.0..=2.0, got {}", temperature),
            });
        }

        Ok(Self {
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model: env_or_default("CHAT_MODEL", &defaults.model),
            temperature,
            max_tokens: env_parse_or("CHAT_MAX_TOKENS", defaults.max_tokens)?,
            timeout_secs: env_parse_or("CHAT_TIMEOUT_SECS", defaults.timeout_secs)?,
            api_key: defaults.api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETRIEVAL_VARS: [&str; 4] = [
        "RETRIEVAL_CANDIDATE_LIMIT",
        "RETRIEVAL_MAX_ENTRIES",
        "RETRIEVAL_MIN_SCORE",
        "RETRIEVAL_MAX_CONTEXT_CHARS",
    ];

    #[test]
    fn test_retrieval_defaults() {
        temp_env::with_vars_unset(RETRIEVAL_VARS, || {
            let config = RetrievalConfig::from_env().unwrap();
            assert_eq!(config, RetrievalConfig::default());
            assert_eq!(config.candidate_limit, 10);
            assert_eq!(config.max_entries, 5);
        });
    }

    #[test]
    fn test_retrieval_overrides() {
        temp_env::with_vars(
            [
                ("RETRIEVAL_CANDIDATE_LIMIT", Some("20")),
                ("RETRIEVAL_MAX_ENTRIES", Some("3")),
                ("RETRIEVAL_MIN_SCORE", Some("0.25")),
                ("RETRIEVAL_MAX_CONTEXT_CHARS", Some("1200")),
            ],
            || {
                let config = RetrievalConfig::from_env().unwrap();
                assert_eq!(config.candidate_limit, 20);
                assert_eq!(config.max_entries, 3);
                assert_eq!(config.min_score, Some(0.25));
                assert_eq!(config.max_context_chars, 1200);
            },
        );
    }

    #[test]
    fn test_candidate_limit_must_cover_max_entries() {
        temp_env::with_vars(
            [
                ("RETRIEVAL_CANDIDATE_LIMIT", Some("2")),
                ("RETRIEVAL_MAX_ENTRIES", Some("5")),
            ],
            || {
                assert!(matches!(
                    RetrievalConfig::from_env(),
                    Err(ConfigError::Invalid { ref key, .. }) if key == "RETRIEVAL_CANDIDATE_LIMIT"
                ));
            },
        );
    }

    #[test]
    fn test_zero_max_entries_rejected() {
        let config = RetrievalConfig {
            max_entries: 0,
            ..RetrievalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chat_config_from_env() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-chat")),
                ("OPENAI_BASE_URL", None),
                ("CHAT_MODEL", Some("gpt-4o")),
                ("CHAT_TEMPERATURE", None),
                ("CHAT_MAX_TOKENS", Some("256")),
                ("CHAT_TIMEOUT_SECS", None),
            ],
            || {
                let config = ChatConfig::from_env().unwrap();
                assert_eq!(config.api_key, "sk-chat");
                assert_eq!(config.base_url, DEFAULT_OPENAI_BASE_URL);
                assert_eq!(config.model, "gpt-4o");
                assert_eq!(config.temperature, 0.3);
                assert_eq!(config.max_tokens, 256);
                assert_eq!(config.timeout_secs, 30);
            },
        );
    }

    #[test]
    fn test_chat_temperature_out_of_range() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-chat")),
                ("CHAT_TEMPERATURE", Some("3.5")),
            ],
            || {
                assert!(ChatConfig::from_env().is_err());
            },
        );
    }
}
