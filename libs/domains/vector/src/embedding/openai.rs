use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EmbeddingProvider, ensure_provider};
use crate::error::{VectorError, VectorResult};
use crate::models::{EmbeddingModel, EmbeddingProviderType, EmbeddingResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI embedding provider configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// `OPENAI_API_KEY` (required), `OPENAI_BASE_URL`, `EMBEDDING_TIMEOUT_SECS` (default 10).
impl FromEnv for OpenAIConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env_required("OPENAI_API_KEY")?,
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            timeout_secs: env_parse_or("EMBEDDING_TIMEOUT_SECS", 10)?,
        })
    }
}

/// OpenAI `/embeddings` provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> VectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> VectorResult<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
    usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    total_tokens: u32,
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::OpenAI
    }

    async fn embed(&self, model: EmbeddingModel, text: &str) -> VectorResult<EmbeddingResult> {
        let results = self.embed_batch(model, &[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(
        &self,
        model: EmbeddingModel,
        texts: &[String],
    ) -> VectorResult<Vec<EmbeddingResult>> {
        ensure_provider(model, EmbeddingProviderType::OpenAI)?;

        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: model.model_name(),
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VectorError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response.json().await?;

        if embedding_response.data.len() != texts.len() {
            return Err(VectorError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embedding_response.data.len()
            )));
        }

        let mut data = embedding_response.data;
        data.sort_by_key(|d| d.index);

        let total_tokens = embedding_response.usage.map_or(0, |u| u.total_tokens);
        let tokens_per_embedding = total_tokens / texts.len() as u32;
        debug!(model = %model, count = data.len(), total_tokens, "OpenAI embeddings received");

        data.into_iter()
            .map(|d| {
                if d.embedding.is_empty() {
                    Err(VectorError::Embedding("empty embedding vector".to_string()))
                } else {
                    Ok(EmbeddingResult::new(d.embedding, tokens_per_embedding))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(base_url: String) -> OpenAIProvider {
        OpenAIProvider::new(OpenAIConfig::new("sk-test").with_base_url(base_url)).unwrap()
    }

    #[tokio::test]
    async fn test_embed_parses_vector() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "text-embedding-3-small",
                "input": ["reset password"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": [{ "embedding": [0.1, 0.2, 0.3], "index": 0 }],
                    "usage": { "prompt_tokens": 2, "total_tokens": 2 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = provider(server.url())
            .embed(EmbeddingModel::TextEmbedding3Small, "reset password")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.values, vec![0.1, 0.2, 0.3]);
        assert_eq!(result.dimension, 3);
        assert_eq!(result.tokens_used, 2);
    }

    #[tokio::test]
    async fn test_embed_batch_restores_input_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": [
                        { "embedding": [2.0], "index": 1 },
                        { "embedding": [1.0], "index": 0 }
                    ],
                    "usage": { "prompt_tokens": 4, "total_tokens": 4 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let results = provider(server.url())
            .embed_batch(
                EmbeddingModel::TextEmbedding3Small,
                &["first".to_string(), "second".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(results[0].values, vec![1.0]);
        assert_eq!(results[1].values, vec![2.0]);
    }

    #[tokio::test]
    async fn test_embed_api_error_is_embedding_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let err = provider(server.url())
            .embed(EmbeddingModel::TextEmbedding3Small, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::Embedding(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_embed_without_data_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": [] }).to_string())
            .create_async()
            .await;

        let err = provider(server.url())
            .embed(EmbeddingModel::TextEmbedding3Small, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_rejects_foreign_model_without_calling_api() {
        let server = mockito::Server::new_async().await;
        let err = provider(server.url())
            .embed(EmbeddingModel::BgeBaseEnV15, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, VectorError::Validation(_)));
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-env")),
                ("OPENAI_BASE_URL", None),
                ("EMBEDDING_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = OpenAIConfig::from_env().unwrap();
                assert_eq!(config.api_key, "sk-env");
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
                assert_eq!(config.timeout_secs, 3);
            },
        );
    }

    #[test]
    fn test_config_requires_api_key() {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            assert!(OpenAIConfig::from_env().is_err());
        });
    }
}
