use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use database::postgres::PostgresConfig;
use domain_knowledge::{ChatConfig, RetrievalConfig};
use domain_vector::{EmbeddingModel, EmbeddingProviderType, OpenAIConfig, QdrantConfig, WorkersAiConfig};

pub use core_config::Environment;

/// Hosted embedding model for query vectors.
///
/// Selected by `EMBEDDING_MODEL`; the provider follows from the model, and
/// only that provider's credentials are required.
#[derive(Clone, Debug, PartialEq)]
pub enum EmbeddingConfig {
    OpenAI {
        model: EmbeddingModel,
        config: OpenAIConfig,
    },
    WorkersAi {
        model: EmbeddingModel,
        config: WorkersAiConfig,
    },
}

impl EmbeddingConfig {
    pub fn model(&self) -> EmbeddingModel {
        match self {
            EmbeddingConfig::OpenAI { model, .. } | EmbeddingConfig::WorkersAi { model, .. } => {
                *model
            }
        }
    }
}

impl FromEnv for EmbeddingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default(
            "EMBEDDING_MODEL",
            EmbeddingModel::TextEmbedding3Small.model_name(),
        );
        let model: EmbeddingModel = raw.parse().map_err(|e| ConfigError::ParseError {
            key: "EMBEDDING_MODEL".to_string(),
            details: format!("{}", e),
        })?;

        Ok(match model.provider() {
            EmbeddingProviderType::OpenAI => EmbeddingConfig::OpenAI {
                model,
                config: OpenAIConfig::from_env()?,
            },
            EmbeddingProviderType::WorkersAi => EmbeddingConfig::WorkersAi {
                model,
                config: WorkersAiConfig::from_env()?,
            },
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library and the domain crates
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub qdrant: QdrantConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub chat: ChatConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - DATABASE_URL
        let qdrant = QdrantConfig::from_env()?;
        let embedding = EmbeddingConfig::from_env()?;
        let retrieval = RetrievalConfig::from_env()?;
        let chat = ChatConfig::from_env()?; // Required - OPENAI_API_KEY
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            qdrant,
            embedding,
            retrieval,
            chat,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_defaults_to_openai_small() {
        temp_env::with_vars(
            [
                ("EMBEDDING_MODEL", None),
                ("OPENAI_API_KEY", Some("sk-test")),
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.model(), EmbeddingModel::TextEmbedding3Small);
                assert!(matches!(config, EmbeddingConfig::OpenAI { .. }));
            },
        );
    }

    #[test]
    fn test_workers_ai_model_needs_only_cloudflare_credentials() {
        temp_env::with_vars(
            [
                ("EMBEDDING_MODEL", Some("@cf/baai/bge-base-en-v1.5")),
                ("OPENAI_API_KEY", None),
                ("CLOUDFLARE_ACCOUNT_ID", Some("acct")),
                ("CLOUDFLARE_API_TOKEN", Some("token")),
            ],
            || {
                let config = EmbeddingConfig::from_env().unwrap();
                assert_eq!(config.model(), EmbeddingModel::BgeBaseEnV15);
                match config {
                    EmbeddingConfig::WorkersAi { config, .. } => {
                        assert_eq!(config.account_id, "acct");
                    }
                    other => panic!("expected Workers AI, got {:?}", other),
                }
            },
        );
    }

    #[test]
    fn test_unknown_embedding_model_is_parse_error() {
        temp_env::with_var("EMBEDDING_MODEL", Some("word2vec"), || {
            let err = EmbeddingConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "EMBEDDING_MODEL"));
        });
    }

    #[test]
    fn test_missing_provider_credentials_fail() {
        temp_env::with_vars(
            [
                ("EMBEDDING_MODEL", Some("text-embedding-3-large")),
                ("OPENAI_API_KEY", None::<&str>),
            ],
            || {
                let err = EmbeddingConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "OPENAI_API_KEY"));
            },
        );
    }
}
