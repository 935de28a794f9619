use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Qdrant error: {0}")]
    Qdrant(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The provider queued the request instead of answering inline.
    #[error("Embedding deferred by provider (request {0}); asynchronous results are not supported")]
    EmbeddingDeferred(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VectorResult<T> = Result<T, VectorError>;

impl From<qdrant_client::QdrantError> for VectorError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        VectorError::Qdrant(err.to_string())
    }
}

impl From<reqwest::Error> for VectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VectorError::Embedding(format!("request timed out: {}", err))
        } else {
            VectorError::Embedding(err.to_string())
        }
    }
}

impl From<serde_json::Error> for VectorError {
    fn from(err: serde_json::Error) -> Self {
        VectorError::Internal(format!("JSON error: {}", err))
    }
}

impl From<ConfigError> for VectorError {
    fn from(err: ConfigError) -> Self {
        VectorError::Config(err.to_string())
    }
}
